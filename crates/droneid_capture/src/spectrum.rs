use std::f64::consts::PI;

use droneid_dsp::Complex32;
use itertools::izip;
use num::Complex;
use rustfft::FftPlanner;

/// Periodic Hann window of length `n`.
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / n as f64;
            (0.5 * (1.0 - x.cos())) as f32
        })
        .collect()
}

/// Two-sided, fftshifted power spectral density estimate via Welch's
/// method: overlapping Hann-windowed segments, averaged periodograms.
/// Returns `None` if `samples` is shorter than one segment.
pub fn welch_psd(samples: &[Complex32], nfft: usize) -> Option<Vec<f64>> {
    if samples.len() < nfft {
        return None;
    }
    let window = hann_window(nfft);
    let hop = nfft / 2;
    let fft = FftPlanner::new().plan_fft_forward(nfft);

    let mut acc = vec![0.0f64; nfft];
    let mut count = 0usize;
    let mut start = 0;
    while start + nfft <= samples.len() {
        let mut buf: Vec<Complex32> = izip!(&samples[start..start + nfft], &window)
            .map(|(s, w)| s * w)
            .collect();
        fft.process(&mut buf);
        for (acc_bin, v) in izip!(acc.iter_mut(), buf.iter()) {
            *acc_bin += (v.norm_sqr()) as f64;
        }
        count += 1;
        start += hop;
    }

    for v in acc.iter_mut() {
        *v /= count as f64;
    }
    Some(fftshift(&acc))
}

/// Frequency bins for an `n`-point FFT at sample rate `fs`, in fftshift
/// order (negative frequencies first, DC in the middle).
pub fn fftshift_freqs(n: usize, fs: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..n)
        .map(|k| {
            let signed = if k <= n / 2 {
                k as f64
            } else {
                k as f64 - n as f64
            };
            signed * fs / n as f64
        })
        .collect();
    fftshift(&raw)
}

pub fn fftshift<T: Clone>(v: &[T]) -> Vec<T> {
    let half = v.len() / 2;
    let mut out = Vec::with_capacity(v.len());
    out.extend_from_slice(&v[half..]);
    out.extend_from_slice(&v[..half]);
    out
}

/// Splits a boolean mask into `(start, end)` ranges of consecutive `true`
/// runs, mirroring the source's `consecutive` helper for splitting an index
/// array into contiguous groups.
pub fn consecutive_runs(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < mask.len() {
        if mask[i] {
            let start = i;
            while i < mask.len() && mask[i] {
                i += 1;
            }
            runs.push((start, i));
        } else {
            i += 1;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fftshift_round_trip() {
        let v = vec![1, 2, 3, 4];
        assert_eq!(fftshift(&fftshift(&v)), v);
    }

    #[test]
    fn consecutive_runs_finds_groups() {
        let mask = vec![false, true, true, false, true, false, false, true];
        let runs = consecutive_runs(&mask);
        assert_eq!(runs, vec![(1, 3), (4, 5), (7, 8)]);
    }
}
