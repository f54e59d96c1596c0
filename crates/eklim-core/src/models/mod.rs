//! Shared data models for fault-log retrieval

mod fault;
mod pin;
mod time;

pub use fault::*;
pub use pin::*;
pub use time::*;
