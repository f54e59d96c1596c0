//! eklim-uart - fault-log retrieval over the gateway's UART command channel
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                FaultRetriever                 │
//! │  count query, paced descending fetch loop,   │
//! │  progress, cancellation, exclusivity         │
//! │                      │                       │
//! │          ┌───────────┴───────────┐           │
//! │          │   protocol            │           │
//! │          │   (AN / NNNNNv,       │           │
//! │          │    record decoding)   │           │
//! │          └───────────┬───────────┘           │
//! │                      │                       │
//! │             ┌────────┴────────┐              │
//! │             │ CommandChannel  │              │
//! │             │ (gateway/mock)  │              │
//! │             └─────────────────┘              │
//! └──────────────────────────────────────────────┘
//! ```

pub mod channel;
pub mod config;
pub mod protocol;
pub mod retrieval;

pub use channel::{ChannelEnvelope, ChannelError, ChannelReply, CommandChannel};
pub use config::{ConfigError, MockConfig, RetrievalConfig};
pub use protocol::{decode_fault_record, parse_count_response, DecodeError, DeviceCommand};
pub use retrieval::{
    FaultRetriever, RetrievalOutcome, RetrievalProgress, RetrievalSummary, SessionState,
};

// Re-export for convenience
pub use eklim_core::{FaultError, FaultRecord, FaultResult, PinCategory, PinFilter};
