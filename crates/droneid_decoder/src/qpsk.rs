use droneid_dsp::Complex32;

/// One of the four 90-degree rotations tried when demapping QPSK symbols,
/// since the pipeline has no absolute phase reference into the
/// constellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    R0,
    R1,
    R2,
    R3,
}

pub const ALL_ROTATIONS: [Rotation; 4] = [Rotation::R0, Rotation::R1, Rotation::R2, Rotation::R3];

/// Quadrant-to-value table, one row per quadrant and one column per
/// rotation, matching the fixed assignment the demodulator's upstream
/// scrambler expects.
const QUADRANT_TABLE: [[u8; 4]; 4] = [
    // (+,+)
    [2, 0, 1, 3],
    // (+,-)
    [3, 2, 0, 1],
    // (-,-)
    [1, 3, 2, 0],
    // (-,+)
    [0, 1, 3, 2],
];

fn quadrant_of(sample: Complex32) -> usize {
    match (sample.re >= 0.0, sample.im >= 0.0) {
        (true, true) => 0,
        (true, false) => 1,
        (false, false) => 2,
        (false, true) => 3,
    }
}

impl Rotation {
    fn column(self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R1 => 1,
            Rotation::R2 => 2,
            Rotation::R3 => 3,
        }
    }
}

/// Maps one equalized subcarrier to its 2-bit quadrant value under the given
/// rotation hypothesis.
pub fn demap_one(sample: Complex32, rotation: Rotation) -> u8 {
    QUADRANT_TABLE[quadrant_of(sample)][rotation.column()]
}

/// Demaps every subcarrier in `symbol` under `rotation` and expands each
/// 2-bit value into two boolean columns (MSB first) via masks `1` and `2`.
pub fn demap_symbol(symbol: &[Complex32], rotation: Rotation) -> Vec<bool> {
    let mut bits = Vec::with_capacity(symbol.len() * 2);
    for &sample in symbol {
        let value = demap_one(sample, rotation);
        bits.push(value & 2 != 0);
        bits.push(value & 1 != 0);
    }
    bits
}
