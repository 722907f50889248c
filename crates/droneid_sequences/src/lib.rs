//! Reference sequence generators: Zadoff-Chu (synchronization and channel
//! estimation pilots) and the Gold sequence (descrambling).
//!
//! Stands in for the teacher's `dab_ofdm_phase_reference_symbol` module,
//! which builds DAB's table-driven phase reference symbol the same way this
//! builds a Zadoff-Chu sequence: a pure function from a handful of
//! parameters to a reference vector the demodulator correlates against.

mod gold;
mod zadoff_chu;

pub use gold::gold_sequence;
pub use zadoff_chu::{zc_freq_domain, zc_time_domain};
