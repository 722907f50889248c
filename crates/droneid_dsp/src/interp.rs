use std::f64::consts::PI;

use itertools::iproduct;
use num::Complex;

use crate::Complex32;

/// One-sided cross-correlation: the zero-lag-onward half of the full linear
/// correlation between `x` and `y`. For `y == x` this is the
/// autocorrelation tail, used by the frame demodulator's coarse symbol
/// search.
pub fn corr(x: &[Complex32], y: &[Complex32]) -> Vec<Complex32> {
    let full_len = x.len() + y.len() - 1;
    let mut full = vec![Complex::new(0.0f32, 0.0); full_len];
    for ((i, &xi), (j, &yj)) in iproduct!(x.iter().enumerate(), y.iter().enumerate()) {
        full[i + j] += xi * yj.conj();
    }
    full[full_len / 2..].to_vec()
}

/// Multiplies by `exp(2*pi*j*offset_hz*t)` with `t = n / fs`.
pub fn fshift(samples: &[Complex32], offset_hz: f64, fs: f64) -> Vec<Complex32> {
    samples
        .iter()
        .enumerate()
        .map(|(n, &s)| {
            let t = n as f64 / fs;
            let phase = 2.0 * PI * offset_hz * t;
            let rot = Complex::new(phase.cos() as f32, phase.sin() as f32);
            s * rot
        })
        .collect()
}

/// Linearly interpolates `data` at grid points `n + offset` for
/// `n in [0, data.len())`. `offset` may be fractional and negative;
/// out-of-range lookups are clamped to the boundary sample rather than
/// extrapolated, matching `numpy.interp`'s default behavior.
pub fn with_sample_offset(data: &[Complex32], offset: f64) -> Vec<Complex32> {
    (0..data.len())
        .map(|n| interp_at(data, n as f64 + offset))
        .collect()
}

/// Linear resampling from `fs_old` to `fs_new`: output index `k` samples
/// input position `k * fs_old / fs_new`.
pub fn resample(data: &[Complex32], fs_old: f64, fs_new: f64) -> Vec<Complex32> {
    let step = fs_old / fs_new;
    let n_out = (((data.len() - 1) as f64) / step).floor() as usize + 1;
    (0..n_out).map(|k| interp_at(data, k as f64 * step)).collect()
}

fn interp_at(data: &[Complex32], pos: f64) -> Complex32 {
    let last = data.len() - 1;
    let lo = pos.floor();
    let frac = (pos - lo) as f32;
    let lo_idx = lo as isize;

    let clamp = |idx: isize| -> usize { idx.clamp(0, last as isize) as usize };

    let a = data[clamp(lo_idx)];
    let b = data[clamp(lo_idx + 1)];
    a + (b - a) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_sample_offset_zero_is_identity() {
        let data: Vec<Complex32> = (0..16).map(|n| Complex::new(n as f32, 0.0)).collect();
        let out = with_sample_offset(&data, 0.0);
        assert_eq!(data, out);
    }

    #[test]
    fn with_sample_offset_half_sample_averages_neighbors() {
        let data: Vec<Complex32> = (0..4).map(|n| Complex::new(n as f32, 0.0)).collect();
        let out = with_sample_offset(&data, 0.5);
        assert!((out[0].re - 0.5).abs() < 1e-6);
        assert!((out[1].re - 1.5).abs() < 1e-6);
    }

    #[test]
    fn resample_upsampling_doubles_length_roughly() {
        let data: Vec<Complex32> = (0..10).map(|n| Complex::new(n as f32, 0.0)).collect();
        let out = resample(&data, 1.0, 2.0);
        assert_eq!(out.len(), 19);
    }
}
