use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is {0} bytes, need at least 91")]
    TooShort(usize),
    #[error("serial number is not valid UTF-8")]
    InvalidSerial,
    #[error("uuid is not valid UTF-8")]
    InvalidUuid,
}
