use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DroneIdError, PacketType};

/// Every tunable enumerated in the external interface: the knobs a caller
/// can set whether driving the pipeline offline from a file or live from an
/// SDR. `serde`-derived so it can be loaded from a TOML file and layered
/// under CLI overrides; the binary is the only place that parses it from
/// argv directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub packet_type: String,
    pub sample_rate_hz: f64,
    pub skip_detection: bool,
    pub enable_zc_detection: bool,
    pub debug: bool,
    /// Duration to dwell on one band before hopping, in seconds. Live mode
    /// only.
    pub duration_per_band_s: f64,
    pub worker_count: usize,
    /// SDR gain in dB. Live mode only.
    pub gain_db: f64,
    /// Frequencies to scan, in Hz. Live mode only; empty means offline.
    pub frequencies_to_scan_hz: Vec<f64>,
    /// Number of consecutive unproductive chunks on a locked frequency
    /// before the scanner falls back to scanning the full list again.
    pub lock_giveup_after: usize,
    /// Optional path to append every structurally-decoded (pre-CRC) bit
    /// frame to, mirroring the reference receiver's debug log.
    pub bits_log_path: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            packet_type: "droneid".to_string(),
            sample_rate_hz: 50.0e6,
            skip_detection: false,
            enable_zc_detection: true,
            debug: false,
            duration_per_band_s: 1.3,
            worker_count: 2,
            gain_db: 40.0,
            frequencies_to_scan_hz: Vec::new(),
            lock_giveup_after: 10,
            bits_log_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn packet_type(&self) -> Result<PacketType, DroneIdError> {
        PacketType::from_str_loose(&self.packet_type).ok_or_else(|| {
            DroneIdError::ConfigError(format!("unknown packet type '{}'", self.packet_type))
        })
    }

    /// Validates cross-field constraints the config can't express in its
    /// field types alone.
    pub fn validate(&self) -> Result<(), DroneIdError> {
        let packet_type = self.packet_type()?;
        if let Some(profile) = packet_type.demod_profile() {
            let target = profile.params().demod_rate_hz;
            if self.sample_rate_hz < target - 100e3 {
                return Err(DroneIdError::ConfigError(format!(
                    "sample rate {} Hz too low for profile demod rate {} Hz",
                    self.sample_rate_hz, target
                )));
            }
        }
        if self.worker_count == 0 {
            return Err(DroneIdError::ConfigError(
                "worker_count must be at least 1".to_string(),
            ));
        }
        debug!(packet_type = %self.packet_type, workers = self.worker_count, "config validated");
        Ok(())
    }
}
