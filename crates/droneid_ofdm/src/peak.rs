/// Finds local maxima in `data` at least `min_distance` apart, returning
/// them ordered by index with their approximate topographic prominence
/// (height above the higher of its two neighboring valleys).
///
/// This is a simplified prominence suitable for the single dominant
/// autocorrelation peak the coarse symbol search expects; it is not a
/// general-purpose replacement for exhaustive prominence algorithms on
/// signals with many nested peaks. Flat runs (a noise floor with no
/// variation at all) never count as peaks, since they have no point that
/// strictly exceeds a neighbor.
pub fn find_peaks_with_prominence(data: &[f64], min_distance: usize) -> Vec<(usize, f64)> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    // A local-maximum candidate is any point not strictly smaller than
    // either neighbor, with at least one strictly larger neighbor on some
    // side elsewhere in the signal — in practice: strictly greater than the
    // lower of its two neighbors, and not strictly smaller than the other.
    let mut candidates: Vec<usize> = Vec::new();
    for i in 0..n {
        let left_ok = i == 0 || data[i] >= data[i - 1];
        let right_ok = i + 1 == n || data[i] >= data[i + 1];
        let strictly_above_one_side =
            (i > 0 && data[i] > data[i - 1]) || (i + 1 < n && data[i] > data[i + 1]);
        if left_ok && right_ok && strictly_above_one_side {
            candidates.push(i);
        }
    }

    // Greedy non-max suppression by height: tallest candidates win the
    // exclusion zone around them first.
    candidates.sort_by(|&a, &b| data[b].partial_cmp(&data[a]).unwrap());
    let mut selected: Vec<usize> = Vec::new();
    for idx in candidates {
        let too_close = selected
            .iter()
            .any(|&s| s.abs_diff(idx) < min_distance.max(1));
        if !too_close {
            selected.push(idx);
        }
    }
    selected.sort_unstable();

    selected
        .into_iter()
        .map(|idx| (idx, prominence_at(data, idx)))
        .collect()
}

fn prominence_at(data: &[f64], idx: usize) -> f64 {
    let peak_val = data[idx];

    let mut left_min = peak_val;
    for v in data[..idx].iter().rev() {
        if *v > peak_val {
            break;
        }
        left_min = left_min.min(*v);
    }

    let mut right_min = peak_val;
    for v in data[idx + 1..].iter() {
        if *v > peak_val {
            break;
        }
        right_min = right_min.min(*v);
    }

    peak_val - left_min.max(right_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolated_spike_has_full_prominence() {
        let mut data = vec![0.0; 20];
        data[10] = 5.0;
        let peaks = find_peaks_with_prominence(&data, 4);
        let (idx, prom) = peaks.iter().find(|(i, _)| *i == 10).unwrap();
        assert_eq!(*idx, 10);
        assert!((*prom - 5.0).abs() < 1e-9);
    }

    #[test]
    fn flat_signal_has_no_peaks() {
        let data = vec![1.0; 50];
        assert!(find_peaks_with_prominence(&data, 4).is_empty());
    }

    #[test]
    fn two_spikes_closer_than_min_distance_keep_only_the_taller() {
        let mut data = vec![0.0; 30];
        data[10] = 3.0;
        data[12] = 5.0;
        let peaks = find_peaks_with_prominence(&data, 10);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].0, 12);
    }
}
