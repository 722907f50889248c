mod extract;
mod frame;
mod peak;
mod sync;
mod zc;

pub use extract::{extract_symbols, ExtractionParams};
pub use frame::{demodulate, DemodResult, DemodSettings, DemodState};
pub use peak::find_peaks_with_prominence;
pub use sync::find_symbol_start;
pub use zc::{
    average_channel, dc_bin_angle, estimate_channel, find_zc_root, phase_ramp_score, unwrap_phase,
};
