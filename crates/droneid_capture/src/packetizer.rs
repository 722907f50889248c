use droneid_core::PacketType;
use droneid_dsp::Complex32;

use crate::band_estimator::estimate_offset;
use crate::spectrum::{consecutive_runs, hann_window};
use num::Complex;
use rustfft::FftPlanner;
use tracing::debug;

const STFT_NFFT: usize = 64;
const STFT_HOP: usize = 32;
const THRESHOLD_FACTOR: f64 = 1.15;
const GUARD_S: f64 = 3.0 * 15.0e-6;

/// A raw sample window believed to contain one packet, located by its
/// energy envelope's burst duration.
pub struct PacketCandidate {
    pub samples: Vec<Complex32>,
    /// Range in the original chunk the window was extracted from, for
    /// diagnostics.
    pub start: usize,
    pub end: usize,
}

/// Locates packet-shaped energy bursts in a wideband capture via an
/// STFT energy envelope, validating each candidate's occupied band against
/// the packet type's expected bandwidth.
///
/// Returns the accepted candidates plus the center-frequency offset of the
/// last accepted one (the only one the caller needs, since re-tuning happens
/// per candidate in [`crate::tune_and_resample`]).
pub fn find_packet_candidates(
    raw: &[Complex32],
    fs: f64,
    packet_type: PacketType,
) -> (Vec<PacketCandidate>, Option<f64>) {
    if raw.len() < STFT_NFFT {
        return (Vec::new(), None);
    }

    let window = hann_window(STFT_NFFT);
    let fft = FftPlanner::new().plan_fft_forward(STFT_NFFT);

    let mut envelope = Vec::new();
    let mut sum_mag = 0.0f64;
    let mut count_bins = 0usize;

    let mut start = 0;
    while start + STFT_NFFT <= raw.len() {
        let mut buf: Vec<Complex32> = raw[start..start + STFT_NFFT]
            .iter()
            .zip(&window)
            .map(|(s, w)| s * w)
            .collect();
        fft.process(&mut buf);
        let max_mag = buf.iter().map(|c| c.norm() as f64).fold(0.0, f64::max);
        envelope.push(max_mag);
        sum_mag += buf.iter().map(|c| c.norm() as f64).sum::<f64>();
        count_bins += STFT_NFFT;
        start += STFT_HOP;
    }

    let noise_floor = sum_mag / count_bins as f64;
    let above_level: Vec<bool> = envelope
        .iter()
        .map(|&e| e > THRESHOLD_FACTOR * noise_floor)
        .collect();

    let (dur_lo, dur_hi) = packet_type.expected_duration_s();
    let slice_rate = fs / STFT_HOP as f64;
    let min_slices = (dur_lo * slice_rate).floor() as usize;
    let max_slices = (dur_hi * slice_rate).ceil() as usize;
    let guard_samples = (GUARD_S * fs).round() as isize;

    let mut candidates = Vec::new();
    let mut last_offset = None;

    for (run_start, run_end) in consecutive_runs(&above_level) {
        let width = run_end - run_start;
        if width < min_slices || width > max_slices {
            continue;
        }
        let left_sample = run_start * STFT_HOP;
        let right_sample = run_end * STFT_HOP + STFT_NFFT;

        let window_start = ((left_sample as isize) - guard_samples).max(0) as usize;
        let window_end = ((right_sample as isize) + guard_samples).min(raw.len() as isize) as usize;
        if window_start >= window_end {
            continue;
        }
        let window_samples = &raw[window_start..window_end];

        let (offset, found) = estimate_offset(window_samples, fs, packet_type);
        if !found {
            continue;
        }

        candidates.push(PacketCandidate {
            samples: window_samples.to_vec(),
            start: window_start,
            end: window_end,
        });
        last_offset = Some(offset);
    }

    debug!(count = candidates.len(), noise_floor, "packet candidates located");
    (candidates, last_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capture_yields_no_candidates() {
        let raw = vec![Complex::new(0.0f32, 0.0); 16];
        let (candidates, offset) = find_packet_candidates(&raw, 50.0e6, PacketType::DroneId);
        assert!(candidates.is_empty());
        assert!(offset.is_none());
    }

    #[test]
    fn pure_noise_floor_yields_no_candidates() {
        let raw = vec![Complex::new(0.0f32, 0.0); 1 << 14];
        let (candidates, _) = find_packet_candidates(&raw, 50.0e6, PacketType::DroneId);
        assert!(candidates.is_empty());
    }
}
