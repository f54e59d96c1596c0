//! End-to-end tests for EKLİM fault-log retrieval
//!
//! This crate exercises the whole pipeline against the mock channel:
//! - count query and paced descending retrieval (`eklim-uart`)
//! - record decoding and pin classification (`eklim-core`)
//! - delimited-text and spreadsheet exports (`eklim-export`)
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eklim-tests
//! RUST_LOG=eklim_uart=debug cargo test -p eklim-tests -- --nocapture
//! ```
//!
//! # Test Structure
//!
//! - `fault_log_e2e_test.rs` - retrieval scenarios from count to export

// This crate only contains tests, no library code
