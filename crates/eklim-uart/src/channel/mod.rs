//! Command channel to the subordinate microcontroller
//!
//! The gateway forwards one text command at a time over UART and hands back
//! the device's text answer. This module provides:
//! - the [`CommandChannel`] trait consumed by the protocol and retrieval layers
//! - [`ChannelEnvelope`], the gateway's JSON reply shape
//! - a scripted [`mock::MockChannel`] for tests and demos
//!
//! # Example
//!
//! ```ignore
//! use eklim_uart::channel::{mock::MockChannel, CommandChannel};
//! use eklim_uart::config::MockConfig;
//!
//! let channel = MockChannel::new(&MockConfig::default());
//! channel.set_response("AN", "A00050");
//! let reply = channel.send("AN").await?;
//! assert_eq!(reply.response, "A00050");
//! ```

mod adapter;
mod envelope;
pub mod error;
pub mod mock;

pub use adapter::{send_with_timeout, ChannelReply, CommandChannel};
pub use envelope::ChannelEnvelope;
pub use error::ChannelError;
