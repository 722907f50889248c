use droneid_core::{DroneIdError, GOLD_NC, GOLD_SEED};
use droneid_dsp::{CircularBucket, Complex32};
use droneid_sequences::gold_sequence;
use itertools::izip;
use tracing::debug;

use crate::qpsk::{demap_symbol, Rotation};
use crate::rate_match;

const GOLD_REFERENCE_LEN: usize = 1200;
const SYSTEMATIC_OFFSET: usize = 4148;
const SYSTEMATIC_LEN: usize = 1412;
const REFERENCE_THRESHOLD_BITS: usize = 7200;

/// Result of attempting one QPSK rotation hypothesis against a demodulated
/// frame.
#[derive(Debug)]
pub struct DecodeAttempt {
    pub rotation: Rotation,
    pub bytes: Vec<u8>,
    /// `Some(true)` if the embedded 1200-bit Gold reference symbol matched
    /// exactly; `None` when the frame is short enough that no reference
    /// symbol is expected. Mismatches are diagnostic only, never fatal.
    pub gold_reference_match: Option<bool>,
}

/// Demaps, descrambles, and rate-match-inverts one equalized frame under a
/// single rotation hypothesis, producing the raw payload bytes.
///
/// `equalized_symbols` is the full per-symbol frequency-domain frame
/// (including the Zadoff-Chu symbols); `zc_symbol_indices` names the two rows
/// to exclude before assembling the bit matrix.
pub fn decode_frame(
    equalized_symbols: &[Vec<Complex32>],
    zc_symbol_indices: (usize, usize),
    dc_column: usize,
    rotation: Rotation,
) -> Result<DecodeAttempt, DroneIdError> {
    let (zc1, zc2) = zc_symbol_indices;

    let mut rows: Vec<Vec<bool>> = Vec::new();
    for (i, symbol) in equalized_symbols.iter().enumerate() {
        if i == zc1 || i == zc2 {
            continue;
        }
        rows.push(demap_row_dropping_dc(symbol, dc_column, rotation));
    }

    let total_bits: usize = rows.iter().map(|r| r.len()).sum();

    let (bits, gold_reference_match) = if total_bits > REFERENCE_THRESHOLD_BITS {
        let reference_row = &rows[0];
        let reference_bits = &reference_row[..reference_row.len().min(GOLD_REFERENCE_LEN)];
        let expected_reference = gold_sequence(GOLD_SEED, GOLD_NC, reference_bits.len());
        let matches = reference_bits
            .iter()
            .zip(expected_reference.iter())
            .all(|(a, b)| a == b);

        if !matches {
            debug!(rotation = ?rotation, "gold reference symbol mismatch, continuing anyway");
        }

        let mut concatenated = Vec::new();
        for row in &rows[1..] {
            concatenated.extend_from_slice(row);
        }
        (concatenated, Some(matches))
    } else {
        let mut concatenated = Vec::new();
        for row in &rows {
            concatenated.extend_from_slice(row);
        }
        (concatenated, None)
    };

    if bits.is_empty() {
        return Err(DroneIdError::DecodeFailure(
            "no bits remained after dropping the reference symbol".to_string(),
        ));
    }

    let scramble = gold_sequence(GOLD_SEED, GOLD_NC, bits.len());
    let descrambled: Vec<bool> = izip!(bits.iter(), scramble.iter()).map(|(a, b)| a ^ b).collect();

    if descrambled.len() < SYSTEMATIC_LEN {
        return Err(DroneIdError::DecodeFailure(format!(
            "only {} descrambled bits, need at least {} for the systematic window",
            descrambled.len(),
            SYSTEMATIC_LEN
        )));
    }

    let systematic = extract_systematic_window(&descrambled);
    let pre_rate_match = rate_match::inverse(&systematic);
    let bytes = pack_bits_to_bytes(&pre_rate_match);

    Ok(DecodeAttempt {
        rotation,
        bytes,
        gold_reference_match,
    })
}

fn demap_row_dropping_dc(symbol: &[Complex32], dc_column: usize, rotation: Rotation) -> Vec<bool> {
    let without_dc: Vec<Complex32> = symbol
        .iter()
        .enumerate()
        .filter(|&(col, _)| col != dc_column)
        .map(|(_, &sample)| sample)
        .collect();
    demap_symbol(&without_dc, rotation)
}

/// Reads a `SYSTEMATIC_LEN`-bit window starting at `SYSTEMATIC_OFFSET` from
/// `descrambled`, treating it as a cyclic stream (duplicated end to end) so
/// the window can extend past the end and wrap back to the start.
fn extract_systematic_window(descrambled: &[bool]) -> Vec<bool> {
    let mut bucket = CircularBucket::<bool>::new(descrambled.len());
    bucket.consume(descrambled, true);
    let len = bucket.length();
    (0..SYSTEMATIC_LEN)
        .map(|i| bucket[(SYSTEMATIC_OFFSET + i) % len])
        .collect()
}

/// Packs bits into bytes, MSB-first within each byte. Any trailing bits
/// short of a full byte are dropped.
fn pack_bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | bit as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn symbol_of(value: u8, n: usize) -> Vec<Complex32> {
        let sample = match value {
            2 => Complex::new(1.0f32, 1.0),
            3 => Complex::new(1.0f32, -1.0),
            1 => Complex::new(-1.0f32, -1.0),
            0 => Complex::new(-1.0f32, 1.0),
            _ => unreachable!(),
        };
        vec![sample; n]
    }

    #[test]
    fn legacy_frame_too_short_for_systematic_window_fails() {
        let symbols: Vec<Vec<Complex32>> = (0..7).map(|_| symbol_of(2, 10)).collect();
        let err = decode_frame(&symbols, (0, 6), 5, Rotation::R0).unwrap_err();
        assert!(matches!(err, DroneIdError::DecodeFailure(_)));
    }

    #[test]
    fn pack_bits_to_bytes_drops_a_trailing_partial_byte() {
        let bits = vec![true, false, true, false, true, false, true, false, true];
        assert_eq!(pack_bits_to_bytes(&bits), vec![0b1010_1010]);
    }

    #[test]
    fn systematic_window_wraps_past_the_end_of_a_short_stream() {
        let descrambled: Vec<bool> = (0..50).map(|i| i % 2 == 0).collect();
        let window = extract_systematic_window(&descrambled);
        assert_eq!(window.len(), SYSTEMATIC_LEN);
        for (i, bit) in window.iter().enumerate() {
            assert_eq!(*bit, descrambled[(SYSTEMATIC_OFFSET + i) % descrambled.len()]);
        }
    }
}
