use std::sync::Arc;

use num::Complex;
use rustfft::{Fft, FftPlanner};

use droneid_core::NB_FFT;

use crate::Complex32;

fn forward_plan() -> Arc<dyn Fft<f32>> {
    FftPlanner::new().plan_fft_forward(NB_FFT)
}

fn inverse_plan() -> Arc<dyn Fft<f32>> {
    FftPlanner::new().plan_fft_inverse(NB_FFT)
}

/// Centered FFT: an `NB_FFT`-point DFT re-windowed to `n_carriers` bins
/// straddling DC.
///
/// Carrier `n_carriers / 2` is the null DC bin. Carriers below it come from
/// the negative-frequency tail of the raw FFT output, carriers at and above
/// it from the positive-frequency head — this is what lets a profile's
/// `n_carriers` subcarriers sit centered on the RF center frequency instead
/// of wrapping around bin `NB_FFT - 1`.
pub fn tfft(time_domain: &[Complex32], n_carriers: usize) -> Vec<Complex32> {
    assert!(
        time_domain.len() <= NB_FFT,
        "tfft input longer than the FFT length"
    );

    let mut buf = vec![Complex::new(0.0f32, 0.0); NB_FFT];
    buf[..time_domain.len()].copy_from_slice(time_domain);

    let fft = forward_plan();
    fft.process(&mut buf);

    let half = n_carriers / 2;
    let mut out = Vec::with_capacity(n_carriers);
    out.extend_from_slice(&buf[NB_FFT - half..NB_FFT]);
    out.extend_from_slice(&buf[..n_carriers - half]);
    out
}

/// Inverse of [`tfft`]: scatters a centered `n_carriers`-length spectrum
/// back into an `NB_FFT` buffer and inverse-transforms it.
///
/// `rustfft`'s inverse transform is unnormalized, so the result is scaled
/// by `1 / NB_FFT` to match a round trip through [`tfft`].
pub fn itfft(freq_domain: &[Complex32], n_carriers: usize) -> Vec<Complex32> {
    assert_eq!(freq_domain.len(), n_carriers, "itfft expects n_carriers bins");

    let half = n_carriers / 2;
    let mut buf = vec![Complex::new(0.0f32, 0.0); NB_FFT];
    buf[NB_FFT - half..NB_FFT].copy_from_slice(&freq_domain[..half]);
    buf[..n_carriers - half].copy_from_slice(&freq_domain[half..]);

    let fft = inverse_plan();
    fft.process(&mut buf);

    let scale = 1.0 / NB_FFT as f32;
    for v in buf.iter_mut() {
        *v *= scale;
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_identity_on_centered_spectrum() {
        // tfft(itfft(c)) == c for a centered spectrum c, since itfft zeroes
        // every bin outside the carrier window and tfft only ever reads
        // back that same window.
        let n_carriers = 601;
        let mut spectrum = vec![Complex::new(0.0f32, 0.0); n_carriers];
        for (k, v) in spectrum.iter_mut().enumerate() {
            *v = Complex::new((k as f32 * 0.37).sin(), (k as f32 * 0.61).cos());
        }
        let time = itfft(&spectrum, n_carriers);
        let back = tfft(&time, n_carriers);
        for (a, b) in spectrum.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-4, "{} vs {}", a, b);
        }
    }

    mod proptests {
        use super::*;
        use quickcheck_macros::quickcheck;

        #[quickcheck]
        fn round_trip_holds_for_any_odd_carrier_count(seed: u64, carriers_mod: u16) -> bool {
            let n_carriers = (carriers_mod as usize % 300) * 2 + 1;
            let mut spectrum = vec![Complex::new(0.0f32, 0.0); n_carriers];
            for (k, v) in spectrum.iter_mut().enumerate() {
                let phase = (seed.wrapping_add(k as u64) % 360) as f32 * std::f32::consts::PI / 180.0;
                *v = Complex::new(phase.cos(), phase.sin());
            }
            let time = itfft(&spectrum, n_carriers);
            let back = tfft(&time, n_carriers);
            spectrum
                .iter()
                .zip(back.iter())
                .all(|(a, b)| (a - b).norm() < 1e-3)
        }
    }
}
