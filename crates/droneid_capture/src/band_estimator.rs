use droneid_core::PacketType;
use droneid_dsp::Complex32;

use crate::spectrum::{consecutive_runs, fftshift_freqs, welch_psd};

const NFFT_WELCH: usize = 2048;
const DC_MARKER_HALF_WIDTH: usize = 10;

/// Estimates the center-frequency offset of a packet window from its Welch
/// power spectral density.
///
/// Returns `(offset_hz, found)`. `found` is `false` when the window is
/// shorter than the Welch FFT length or no spectral run matches the packet
/// type's expected occupied bandwidth.
pub fn estimate_offset(samples: &[Complex32], fs: f64, packet_type: PacketType) -> (f64, bool) {
    let psd = match welch_psd(samples, NFFT_WELCH) {
        Some(p) => p,
        None => return (0.0, false),
    };
    let freqs = fftshift_freqs(NFFT_WELCH, fs);

    let mean = psd.iter().sum::<f64>() / psd.len() as f64;

    // Seed a fake DC-carrier marker so a strong LO leakage spike doesn't
    // get misread as part of an adjacent band.
    let mut psd = psd;
    let dc = NFFT_WELCH / 2;
    let lo = dc.saturating_sub(DC_MARKER_HALF_WIDTH);
    let hi = (dc + DC_MARKER_HALF_WIDTH).min(psd.len());
    for bin in psd[lo..hi].iter_mut() {
        *bin = 1.1 * mean;
    }

    let above_mean: Vec<bool> = psd.iter().map(|&p| p > mean).collect();
    let runs = consecutive_runs(&above_mean);

    let (expect_lo, expect_hi) = packet_type.expected_bandwidth_hz();

    for (start, end) in runs {
        let f_start = freqs[start];
        let f_end = freqs[end - 1];
        let bw = f_end - f_start;
        if bw >= expect_lo && bw <= expect_hi {
            return (f_end - 0.5 * bw, true);
        }
    }
    (0.0, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;
    use std::f64::consts::PI;

    #[test]
    fn too_short_window_fails() {
        let samples = vec![Complex::new(0.0f32, 0.0); 64];
        let (_, found) = estimate_offset(&samples, 50.0e6, PacketType::DroneId);
        assert!(!found);
    }

    #[test]
    fn finds_band_centered_on_injected_tone_cluster() {
        // Build a wideband noise floor plus a ~9.5 MHz-wide elevated band
        // of tones offset from DC, matching the droneid profile's expected
        // 8-11 MHz occupied bandwidth.
        let fs = 50.0e6;
        let n = 1 << 16;
        let mut samples = vec![Complex::new(0.0f32, 0.0); n];
        let band_center_hz = 4.0e6;
        let band_width_hz = 9.5e6;
        let n_tones = 40;
        for t in 0..n_tones {
            let f = band_center_hz - band_width_hz / 2.0
                + band_width_hz * (t as f64 / n_tones as f64);
            for (i, s) in samples.iter_mut().enumerate() {
                let phase = 2.0 * PI * f * i as f64 / fs;
                *s += Complex::new(phase.cos() as f32, phase.sin() as f32);
            }
        }
        let (offset, found) = estimate_offset(&samples, fs, PacketType::DroneId);
        assert!(found);
        assert!(
            (offset - band_center_hz).abs() < 1.0e6,
            "offset {offset} far from expected {band_center_hz}"
        );
    }
}
