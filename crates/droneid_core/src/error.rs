use thiserror::Error;

/// Error taxonomy for the demodulation pipeline.
///
/// `ConfigError` is the only variant that should abort the process; every
/// other variant is a per-frame condition the orchestrator logs and moves
/// past.
#[derive(Debug, Error)]
pub enum DroneIdError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("detection failure: {0}")]
    DetectionFailure(String),

    #[error("zadoff-chu mismatch: expected root {expected}, found {found}")]
    ZcMismatch { expected: usize, found: usize },

    #[error("decode failure: {0}")]
    DecodeFailure(String),

    #[error("crc mismatch")]
    CrcMismatch,

    #[error("hardware receive timed out")]
    HardwareTimeout,

    /// An internal invariant was violated on data that should have already
    /// been validated (e.g. a zero channel bin surviving DC pinning). These
    /// indicate a bug rather than a malformed signal.
    #[error("dsp invariant violated: {0}")]
    Dsp(String),
}

impl DroneIdError {
    /// Whether this error should terminate the process, per the propagation
    /// policy: only configuration errors are fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DroneIdError::ConfigError(_))
    }
}
