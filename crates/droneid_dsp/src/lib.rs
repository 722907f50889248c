//! DSP primitives shared by every stage of the pipeline: the centered FFT
//! convention, correlation, frequency shifting, and resampling.
//!
//! These mirror the free functions at the bottom of the teacher's OFDM
//! demodulator (`calculate_relative_phase`, `calculate_magnitude_spectrum`,
//! `span_slice`) in spirit: small, allocation-light, `#[inline]`-annotated
//! helpers with no state of their own.

pub mod bucket;
mod fft;
mod interp;

pub use bucket::{circular_bucket::CircularBucket, linear_bucket::LinearBucket};
pub use fft::{itfft, tfft};
pub use interp::{corr, fshift, resample, with_sample_offset};

use num::Complex;

/// 32-bit complex sample, used end to end from raw I/Q through to equalized
/// subcarriers.
pub type Complex32 = Complex<f32>;
/// Widened precision for channel estimation and phase-unwrap math, where
/// accumulated rounding error in `f32` would bias the sampling-offset and
/// carrier-phase searches.
pub type Complex64 = Complex<f64>;
