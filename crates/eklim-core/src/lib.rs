//! eklim-core - Core types for EKLİM fault-log retrieval
//!
//! This crate holds the pieces shared by the device-facing retrieval crate
//! (`eklim-uart`) and the export crate (`eklim-export`):
//!
//! - [`FaultRecord`] and the value types it is built from
//! - the user-facing error taxonomy ([`FaultError`])

pub mod error;
pub mod models;

pub use error::{FaultError, FaultResult, RangeError};
pub use models::*;
