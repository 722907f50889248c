//! Shared parameter tables, error kinds, and configuration types used across
//! the demodulation pipeline.
//!
//! Mirrors the role of the teacher's own core crate: everything downstream
//! stages need to agree on (carrier counts, cyclic-prefix patterns, error
//! taxonomy) lives here so no stage hardcodes a profile constant locally.

mod error;
mod profile;
mod config;

pub use error::DroneIdError;
pub use profile::{PacketType, Profile, ProfileParams};
pub use config::PipelineConfig;

/// FFT length used by every profile. Fixed by the radio's numerology.
pub const NB_FFT: usize = 1024;

/// Gold-sequence parameters shared by descrambling and the diagnostic
/// reference symbol.
pub const GOLD_NC: usize = 1600;
pub const GOLD_SEED: u32 = 0x1234_5678;
