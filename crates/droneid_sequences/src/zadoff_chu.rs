use std::f64::consts::PI;

use droneid_dsp::{tfft, Complex32};
use num::Complex;

/// Zadoff-Chu sequence in the time domain: `z_u[n] = exp(-j*pi*u*n*(n+1)/L)`
/// for root `u` and length `L`. Constant-amplitude by construction — every
/// sample has unit magnitude.
pub fn zc_time_domain(root: usize, length: usize) -> Vec<Complex32> {
    (0..length)
        .map(|n| {
            let n = n as f64;
            let phase = -PI * root as f64 * n * (n + 1.0) / length as f64;
            Complex::new(phase.cos() as f32, phase.sin() as f32)
        })
        .collect()
}

/// Zadoff-Chu sequence transformed into the centered frequency domain via
/// [`tfft`], with the null DC bin forced to zero to match the reference the
/// demodulator's channel estimator expects.
pub fn zc_freq_domain(root: usize, n_carriers: usize) -> Vec<Complex32> {
    let time = zc_time_domain(root, n_carriers);
    let mut freq = tfft(&time, n_carriers);
    freq[n_carriers / 2] = Complex::new(0.0, 0.0);
    freq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_domain_has_unit_magnitude() {
        let z = zc_time_domain(600, 601);
        for sample in z {
            assert!((sample.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn freq_domain_dc_bin_is_zero() {
        let z = zc_freq_domain(147, 601);
        assert_eq!(z[601 / 2], Complex::new(0.0, 0.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn unit_magnitude_holds_for_any_root_and_length(root: usize, length: u8) -> bool {
        let length = (length as usize % 600) + 1;
        let root = (root % length).max(1);
        zc_time_domain(root, length)
            .iter()
            .all(|s| (s.norm() - 1.0).abs() < 1e-5)
    }
}
