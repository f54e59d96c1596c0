//! Record decoding errors

use eklim_core::{FaultError, RangeError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Record body too short: {len} characters, need at least 22")]
    TooShort { len: usize },

    #[error("Invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("{field} value {value} out of range")]
    OutOfRange { field: &'static str, value: u32 },
}

impl From<RangeError> for DecodeError {
    fn from(err: RangeError) -> Self {
        DecodeError::OutOfRange {
            field: err.field,
            value: err.value,
        }
    }
}

impl From<DecodeError> for FaultError {
    fn from(err: DecodeError) -> Self {
        FaultError::Decode(err.to_string())
    }
}
