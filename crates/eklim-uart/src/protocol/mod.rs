//! Fault-log protocol spoken by the microcontroller
//!
//! Two commands matter for fault retrieval:
//! - `AN` asks for the number of stored fault records (`A` + decimal digits)
//! - `NNNNNv` asks for the record in slot `NNNNN` (`<index>:<fields>`)
//!
//! Record fields are fixed-width text, see [`record::decode_fault_record`].

pub mod command;
pub mod count;
pub mod error;
pub mod record;

pub use command::DeviceCommand;
pub use count::{parse_count_response, query_total_fault_count};
pub use error::DecodeError;
pub use record::{decode_fault_record, fetch_fault_record, MIN_BODY_LEN};
