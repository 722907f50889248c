mod crc;
mod device_type;
mod error;
mod payload;

pub use crc::crc16;
pub use device_type::device_type_name;
pub use error::PayloadError;
pub use payload::{DroneIdPayload, PAYLOAD_LEN};
