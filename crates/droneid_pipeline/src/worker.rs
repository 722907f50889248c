use droneid_core::PacketType;
use droneid_decoder::{decode_frame, ALL_ROTATIONS};
use droneid_dsp::Complex32;
use droneid_ofdm::{demodulate, DemodSettings};
use droneid_payload::{DroneIdPayload, PAYLOAD_LEN};
use tracing::{debug, trace, warn};

use crate::bits_log::BitsLog;
use crate::stats::PipelineStats;

/// Runs the full packetize -> tune/resample -> demod -> decode chain over
/// one chunk of I/Q samples. Returns whether any candidate in this chunk
/// produced a structurally valid byte frame (used by the frequency scanner
/// to decide whether to stay locked on this band).
pub fn process_chunk(
    samples: &[Complex32],
    fs: f64,
    packet_type: PacketType,
    skip_detection: bool,
    stats: &PipelineStats,
    bits_log: Option<&BitsLog>,
) -> bool {
    let capture = droneid_capture::SpectrumCapture::new(samples, fs, packet_type, skip_detection);
    let mut found = false;

    for idx in 0..capture.packets.len() {
        stats.add_candidate();

        let (window, _offset_hz) = match capture.get_packet_samples(idx, fs, packet_type) {
            Ok(v) => v,
            Err(e) => {
                trace!(candidate = idx, error = %e, "candidate failed tuning/resampling");
                continue;
            }
        };

        let Some(profile) = packet_type.demod_profile() else {
            continue;
        };
        let params = profile.params();

        let demod_result = match demodulate(&window, params.demod_rate_hz, profile, &DemodSettings::default()) {
            Ok(r) => r,
            Err(e) => {
                debug!(candidate = idx, error = %e, "frame demod failed");
                continue;
            }
        };

        if try_all_rotations(&demod_result.equalized_symbols, &params, stats, bits_log) {
            found = true;
        }
    }

    found
}

fn try_all_rotations(
    equalized_symbols: &[Vec<Complex32>],
    params: &droneid_core::ProfileParams,
    stats: &PipelineStats,
    bits_log: Option<&BitsLog>,
) -> bool {
    for rotation in ALL_ROTATIONS {
        let attempt = match decode_frame(
            equalized_symbols,
            params.zc_symbol_indices,
            params.dc_column(),
            rotation,
        ) {
            Ok(a) => a,
            Err(_) => continue,
        };

        if attempt.bytes.len() < PAYLOAD_LEN {
            continue;
        }

        stats.add_decoded();
        if let Some(log) = bits_log {
            if let Err(e) = log.append(&attempt.bytes) {
                warn!(error = %e, "failed to append decoded bits to log");
            }
        }

        match DroneIdPayload::check_crc(&attempt.bytes) {
            Ok(true) => stats.add_crc_ok(),
            Ok(false) => stats.add_crc_err(),
            Err(_) => stats.add_crc_err(),
        }

        return true;
    }
    false
}
