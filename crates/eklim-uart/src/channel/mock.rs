//! Mock command channel for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::{ChannelError, ChannelReply, CommandChannel};
use crate::config::MockConfig;
use crate::protocol::DeviceCommand;

/// Scripted answer for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Device answers with this text
    Response(String),
    /// Gateway reports the command as failed
    Fail(String),
    /// Device never answers; the caller's timeout decides
    Timeout,
}

/// Mock command channel for testing
pub struct MockChannel {
    config: MockConfig,
    connected: AtomicBool,
    /// Scripted replies (command -> reply)
    replies: RwLock<HashMap<String, MockReply>>,
    sent: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockChannel {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            config: config.clone(),
            connected: AtomicBool::new(true),
            replies: RwLock::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Mock device holding the given record bodies in slots `1..=n`
    ///
    /// Answers the count command with `n + 1` (the device reports one more
    /// than it holds) and each record command with `"<index>:<body>"`.
    pub fn with_fault_log<I, S>(config: &MockConfig, bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channel = Self::new(config);
        let mut count = 0u32;
        for (slot, body) in (1u32..).zip(bodies) {
            channel.set_response(
                DeviceCommand::FaultRecord(slot).to_wire(),
                format!("{}:{}", slot, body.into()),
            );
            count = slot;
        }
        channel.set_response(
            DeviceCommand::FaultCount.to_wire(),
            format!("A{:05}", count + 1),
        );
        channel
    }

    /// Script a successful answer
    pub fn set_response(&self, command: impl Into<String>, response: impl Into<String>) {
        self.set_reply(command, MockReply::Response(response.into()));
    }

    /// Script a gateway-level failure
    pub fn fail_command(&self, command: impl Into<String>, reason: impl Into<String>) {
        self.set_reply(command, MockReply::Fail(reason.into()));
    }

    /// Script a command the device never answers
    pub fn timeout_command(&self, command: impl Into<String>) {
        self.set_reply(command, MockReply::Timeout);
    }

    pub fn set_reply(&self, command: impl Into<String>, reply: MockReply) {
        self.replies.write().insert(command.into(), reply);
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Every command received so far, in order
    pub fn sent_commands(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Highest number of commands ever in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn find_reply(&self, command: &str) -> Option<MockReply> {
        self.replies.read().get(command).cloned()
    }
}

/// Decrements the in-flight counter even when the send future is dropped
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommandChannel for MockChannel {
    async fn send(&self, command: &str) -> Result<ChannelReply, ChannelError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChannelError::Disconnected);
        }

        self.sent.lock().push(command.to_string());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        // Simulate latency
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        tracing::debug!(command, "Mock channel: received command");

        match self.find_reply(command) {
            Some(MockReply::Response(response)) => Ok(ChannelReply::new(response)),
            Some(MockReply::Fail(reason)) => Err(ChannelError::Failed(reason)),
            Some(MockReply::Timeout) => std::future::pending().await,
            None => Err(ChannelError::Failed(format!(
                "no mock response configured for {:?}",
                command
            ))),
        }
    }
}
