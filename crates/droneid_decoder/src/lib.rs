mod decoder;
mod qpsk;
mod rate_match;

pub use decoder::{decode_frame, DecodeAttempt};
pub use qpsk::{demap_one, demap_symbol, Rotation, ALL_ROTATIONS};
pub use rate_match::{forward as rate_match_forward, inverse as rate_match_inverse};
