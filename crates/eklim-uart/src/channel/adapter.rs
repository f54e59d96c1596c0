//! Command channel trait and reply type

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::ChannelError;

/// Successful answer to a single command
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReply {
    /// Text answered by the device, as forwarded by the gateway
    pub response: String,
    /// When the reply was received
    pub timestamp: DateTime<Utc>,
}

impl ChannelReply {
    /// Reply stamped with the current time
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: Utc::now(),
        }
    }

    /// Length of the response in characters
    pub fn response_length(&self) -> usize {
        self.response.chars().count()
    }
}

/// Request/response channel to the microcontroller
///
/// Implementations service one command at a time. Callers must not issue a
/// second `send` before the previous one resolved; the retrieval layer
/// guarantees this for bulk reads.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Send a text command and wait for the device's answer
    ///
    /// # Returns
    /// The device reply, or an error for transport failures, timeouts and
    /// replies the gateway flagged as unsuccessful
    async fn send(&self, command: &str) -> Result<ChannelReply, ChannelError>;
}

/// Send a command, bounding the wait for the answer
///
/// Expiry is reported as [`ChannelError::Timeout`]; the pending send is
/// dropped so the channel is free for the next command.
pub async fn send_with_timeout(
    channel: &dyn CommandChannel,
    command: &str,
    timeout: Duration,
) -> Result<ChannelReply, ChannelError> {
    match tokio::time::timeout(timeout, channel.send(command)).await {
        Ok(result) => result,
        Err(_) => Err(ChannelError::Timeout(timeout)),
    }
}
