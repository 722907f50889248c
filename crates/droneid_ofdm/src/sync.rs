use droneid_core::{DroneIdError, NB_FFT};
use droneid_dsp::Complex32;
use num::Complex;

use crate::peak::find_peaks_with_prominence;

const MIN_PEAK_DISTANCE: usize = 1000;
const MIN_PROMINENCE: f64 = 1.0;

/// Coarse symbol start and fractional frequency offset from cyclic-prefix
/// autocorrelation.
///
/// The CP is a copy of its symbol's tail, `NB_FFT` samples earlier; at the
/// true symbol boundary the windowed autocorrelation `r[n]` peaks, and any
/// residual phase on that peak is the frequency offset accumulated over one
/// FFT period.
pub fn find_symbol_start(
    samples: &[Complex32],
    fs: f64,
    first_cp_len: usize,
) -> Result<(usize, f64), DroneIdError> {
    if samples.len() <= NB_FFT + first_cp_len {
        return Err(DroneIdError::DetectionFailure(
            "capture shorter than one FFT window plus a cyclic prefix".to_string(),
        ));
    }

    let lo = NB_FFT;
    let hi = samples.len() - first_cp_len;
    let mut r = vec![Complex::new(0.0f32, 0.0); hi - lo];
    for (out_idx, n) in (lo..hi).enumerate() {
        let mut acc = Complex::new(0.0f32, 0.0);
        for k in 0..first_cp_len {
            acc += samples[n + k] * samples[n - NB_FFT + k].conj();
        }
        r[out_idx] = acc;
    }

    let magnitudes: Vec<f64> = r.iter().map(|c| c.norm() as f64).collect();
    let peaks = find_peaks_with_prominence(&magnitudes, MIN_PEAK_DISTANCE);
    let (peak_idx, _) = peaks
        .into_iter()
        .find(|(_, prominence)| *prominence > MIN_PROMINENCE)
        .ok_or_else(|| {
            DroneIdError::DetectionFailure(
                "no cyclic-prefix autocorrelation peak with sufficient prominence".to_string(),
            )
        })?;

    let start = lo + peak_idx;
    let peak_value = r[peak_idx];
    let ffo_hz = fs / (2.0 * std::f64::consts::PI * NB_FFT as f64) * (peak_value.arg() as f64);

    Ok((start, ffo_hz))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_symbol_with_cp(cp_len: usize, freq_offset_cycles_per_fft: f64) -> Vec<Complex32> {
        // A single tone whose phase advances `freq_offset_cycles_per_fft`
        // full turns over one FFT period, prefixed with a copy of its tail
        // as the cyclic prefix, matching what a real OFDM symbol looks like
        // from the perspective of CP autocorrelation.
        let total = NB_FFT;
        let omega = 2.0 * std::f64::consts::PI * freq_offset_cycles_per_fft / total as f64;
        let symbol: Vec<Complex32> = (0..total)
            .map(|n| {
                let phase = omega * n as f64;
                Complex::new(phase.cos() as f32, phase.sin() as f32)
            })
            .collect();
        let mut out = Vec::with_capacity(total + cp_len);
        out.extend_from_slice(&symbol[total - cp_len..]);
        out.extend_from_slice(&symbol);
        out
    }

    #[test]
    fn finds_start_one_fft_period_after_the_cyclic_prefix() {
        // r[n] pairs s[n+k] against s[n-NB_FFT+k]; with one CP-prefixed
        // symbol placed at `prefix_len`, the two matching cp_len-length
        // segments (the CP itself, and the tail copy it duplicates) are
        // exactly NB_FFT samples apart, so the peak lands at
        // `prefix_len + NB_FFT`, not at the CP/data boundary.
        let cp_len = 80;
        let prefix_len = 200;
        let mut samples = vec![Complex::new(0.01f32, 0.0); prefix_len];
        samples.extend(synthetic_symbol_with_cp(cp_len, 3.0));
        samples.extend(vec![Complex::new(0.01f32, 0.0); 200]);

        let (start, _ffo) = find_symbol_start(&samples, 15.36e6, cp_len).unwrap();
        assert_eq!(start, prefix_len + NB_FFT);
    }

    #[test]
    fn too_short_capture_fails() {
        let samples = vec![Complex::new(0.0f32, 0.0); 10];
        let err = find_symbol_start(&samples, 15.36e6, 80).unwrap_err();
        assert!(matches!(err, DroneIdError::DetectionFailure(_)));
    }
}
