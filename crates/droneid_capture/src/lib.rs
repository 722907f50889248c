//! Wideband-capture front end: locating packet-shaped energy bursts,
//! estimating their center-frequency offset, and tuning/resampling them
//! down to a profile's demodulation rate.
//!
//! Plays the role the teacher's `dab_radio` crate plays for the digital
//! decoding stage — the layer above raw OFDM that understands "a capture
//! contains packets" rather than "a capture contains symbols".

mod band_estimator;
mod packetizer;
mod spectrum;
mod tuner;

pub use band_estimator::estimate_offset;
pub use packetizer::{find_packet_candidates, PacketCandidate};
pub use tuner::tune_and_resample;

use droneid_core::{DroneIdError, PacketType};
use droneid_dsp::Complex32;

/// One 500ms-scale slice of a capture, packetized into candidate windows.
///
/// Mirrors the source's `SpectrumCapture`: constructed once per chunk, it
/// either packetizes the chunk or (when detection is skipped) treats the
/// entire chunk as a single candidate.
pub struct SpectrumCapture {
    pub packets: Vec<PacketCandidate>,
    pub last_offset_hz: Option<f64>,
}

impl SpectrumCapture {
    pub fn new(
        raw: &[Complex32],
        fs: f64,
        packet_type: PacketType,
        skip_detection: bool,
    ) -> Self {
        if skip_detection {
            return SpectrumCapture {
                packets: vec![PacketCandidate {
                    samples: raw.to_vec(),
                    start: 0,
                    end: raw.len(),
                }],
                last_offset_hz: None,
            };
        }
        let (packets, last_offset_hz) = find_packet_candidates(raw, fs, packet_type);
        SpectrumCapture {
            packets,
            last_offset_hz,
        }
    }

    /// Tunes and resamples candidate `index` to the profile's demod rate.
    pub fn get_packet_samples(
        &self,
        index: usize,
        fs: f64,
        packet_type: PacketType,
    ) -> Result<(Vec<Complex32>, f64), DroneIdError> {
        let candidate = self.packets.get(index).ok_or_else(|| {
            DroneIdError::DetectionFailure(format!("packet index {index} out of range"))
        })?;
        let (offset, found) = estimate_offset(&candidate.samples, fs, packet_type);
        if !found {
            return Err(DroneIdError::DetectionFailure(
                "could not estimate center-frequency offset".to_string(),
            ));
        }
        let target_rate = packet_type
            .demod_profile()
            .map(|p| p.params().demod_rate_hz)
            .unwrap_or(fs);
        tune_and_resample(&candidate.samples, fs, offset, target_rate)
    }
}
