//! Common error types for fault-log retrieval

use thiserror::Error;

/// Result type for fault-log operations
pub type FaultResult<T> = Result<T, FaultError>;

/// Errors surfaced to callers of the fault-log subsystem
#[derive(Debug, Error)]
pub enum FaultError {
    /// Channel failure or timeout for a single request
    #[error("Channel error: {0}")]
    Channel(String),

    /// Malformed, short or inconsistent record text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Another retrieval session is already using the channel
    #[error("A retrieval session is already active")]
    SessionBusy,

    /// Requested device slot is outside the addressable range
    #[error("Invalid fault index {index} (valid range 1..={max})")]
    InvalidIndex {
        /// Requested slot
        index: u32,
        /// Highest addressable slot
        max: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export serialization error
    #[error("Export error: {0}")]
    Export(String),
}

/// A value fell outside the range allowed for its field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} value {value} out of range {min}..={max}")]
pub struct RangeError {
    /// Field name (e.g. "month")
    pub field: &'static str,
    /// Offending value
    pub value: u32,
    /// Lowest accepted value
    pub min: u32,
    /// Highest accepted value
    pub max: u32,
}

impl RangeError {
    /// Check `value` against an inclusive range
    pub fn check(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, RangeError> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(RangeError {
                field,
                value,
                min,
                max,
            })
        }
    }
}

impl From<RangeError> for FaultError {
    fn from(err: RangeError) -> Self {
        FaultError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_check() {
        assert_eq!(RangeError::check("month", 12, 1, 12), Ok(12));

        let err = RangeError::check("month", 13, 1, 12).unwrap_err();
        assert_eq!(err.field, "month");
        assert_eq!(err.to_string(), "month value 13 out of range 1..=12");
    }

    #[test]
    fn test_range_error_converts_to_decode() {
        let err: FaultError = RangeError::check("hour", 24, 0, 23).unwrap_err().into();
        assert!(matches!(err, FaultError::Decode(_)));
        assert_eq!(err.to_string(), "Decode error: hour value 24 out of range 0..=23");
    }
}
