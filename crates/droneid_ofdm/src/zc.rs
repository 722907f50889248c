use droneid_dsp::Complex32;
use droneid_sequences::{zc_freq_domain, zc_time_domain};
use num::Complex;

/// Correlates a received frequency-domain symbol against a candidate
/// Zadoff-Chu time-domain sequence of the same length and returns the
/// magnitude of their zero-lag inner product.
fn correlation_magnitude(received: &[Complex32], candidate: &[Complex32]) -> f64 {
    let sum: Complex32 = received
        .iter()
        .zip(candidate)
        .map(|(a, b)| a * b.conj())
        .fold(Complex::new(0.0, 0.0), |acc, v| acc + v);
    sum.norm() as f64
}

/// Brute-force Zadoff-Chu root search: tries every root in `[1, n_carriers)`
/// and returns the one whose time-domain sequence best correlates with the
/// received frequency-domain symbol.
pub fn find_zc_root(received_freq_symbol: &[Complex32], n_carriers: usize) -> usize {
    (1..n_carriers)
        .map(|root| {
            let candidate = zc_time_domain(root, n_carriers);
            (root, correlation_magnitude(received_freq_symbol, &candidate))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(root, _)| root)
        .unwrap_or(0)
}

/// Per-symbol channel estimate: received bins divided by the expected
/// Zadoff-Chu spectrum, with the DC bin pinned to `1` on the reference side
/// to avoid dividing by its forced-zero value.
pub fn estimate_channel(received_freq_symbol: &[Complex32], root: usize, n_carriers: usize) -> Vec<Complex32> {
    let mut expected = zc_freq_domain(root, n_carriers);
    expected[n_carriers / 2] = Complex::new(1.0, 0.0);
    received_freq_symbol
        .iter()
        .zip(expected.iter())
        .map(|(r, e)| r / e)
        .collect()
}

pub fn average_channel(a: &[Complex32], b: &[Complex32]) -> Vec<Complex32> {
    a.iter().zip(b).map(|(x, y)| (x + y) * 0.5).collect()
}

/// Unwraps a sequence of phase angles (radians) so consecutive values never
/// jump by more than pi, removing the 2*pi branch-cut discontinuities that
/// `atan2`-derived angles introduce.
pub fn unwrap_phase(angles: &[f64]) -> Vec<f64> {
    if angles.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(angles.len());
    out.push(angles[0]);
    let mut offset = 0.0;
    for pair in angles.windows(2) {
        let diff = pair[1] - pair[0];
        if diff > std::f64::consts::PI {
            offset -= 2.0 * std::f64::consts::PI;
        } else if diff < -std::f64::consts::PI {
            offset += 2.0 * std::f64::consts::PI;
        }
        out.push(pair[1] + offset);
    }
    out
}

/// Residual phase ramp across subcarriers for a candidate sampling offset:
/// the unwrapped angle of (reference / received) on the Zadoff-Chu symbol,
/// with the null DC bin replaced by its neighbor so it doesn't inject a
/// discontinuity into the unwrap.
pub fn phase_ramp_score(received_freq_symbol: &[Complex32], root: usize, n_carriers: usize) -> f64 {
    let reference = zc_time_domain(root, n_carriers);
    let dc = n_carriers / 2;

    let mut angles: Vec<f64> = reference
        .iter()
        .zip(received_freq_symbol.iter())
        .map(|(z, y)| {
            if y.norm() == 0.0 {
                (z / Complex::new(1.0f32, 0.0)).arg() as f64
            } else {
                (z / y).arg() as f64
            }
        })
        .collect();
    if dc > 0 && dc + 1 < angles.len() {
        angles[dc] = angles[dc - 1];
    }

    let unwrapped = unwrap_phase(&angles);
    let mean = unwrapped.iter().sum::<f64>() / unwrapped.len() as f64;
    let variance = unwrapped.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / unwrapped.len() as f64;
    variance.sqrt()
}

/// DC-bin carrier phase of a Zadoff-Chu symbol: the angle at
/// `n_carriers / 2`. Used directly as the residual carrier-phase correction
/// even though that bin is nominally a null — the source's codified (if
/// surprising) behavior, kept as-is rather than the alternative (reference
/// minus received phase slope) computed but discarded alongside it.
pub fn dc_bin_angle(freq_symbol: &[Complex32], n_carriers: usize) -> f64 {
    freq_symbol[n_carriers / 2].arg() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use droneid_sequences::zc_freq_domain as zcf;

    #[test]
    fn recovers_known_root() {
        let root = 147;
        let n_carriers = 601;
        let received = zcf(root, n_carriers);
        let found = find_zc_root(&received, n_carriers);
        assert_eq!(found, root);
    }

    #[test]
    fn channel_of_matched_root_is_near_unity_off_dc() {
        let root = 600;
        let n_carriers = 601;
        let received = zcf(root, n_carriers);
        let channel = estimate_channel(&received, root, n_carriers);
        for (i, c) in channel.iter().enumerate() {
            if i == n_carriers / 2 {
                continue;
            }
            assert!((c.norm() - 1.0).abs() < 1e-3, "bin {i}: {c}");
        }
    }

    #[test]
    fn unwrap_removes_branch_jumps() {
        let angles = vec![3.0, -3.1, 3.0, -3.1];
        let unwrapped = unwrap_phase(&angles);
        for pair in unwrapped.windows(2) {
            assert!((pair[1] - pair[0]).abs() < std::f64::consts::PI + 1e-6);
        }
    }
}
