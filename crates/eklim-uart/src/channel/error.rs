//! Channel layer errors

use std::time::Duration;

use eklim_core::FaultError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Command failed: {0}")]
    Failed(String),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Channel disconnected")]
    Disconnected,

    #[error("Invalid reply envelope: {0}")]
    InvalidEnvelope(String),
}

impl From<ChannelError> for FaultError {
    fn from(err: ChannelError) -> Self {
        FaultError::Channel(err.to_string())
    }
}
