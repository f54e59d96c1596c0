//! eklim-export - fault record exports
//!
//! Pure serializers from an ordered slice of [`FaultRecord`]s to the two
//! formats the dashboard offers for download. Neither touches the
//! filesystem; naming and delivering the file is the caller's job.
//!
//! - [`to_delimited_text`]: `;`-separated text with a `sep=;` directive and a
//!   byte-order mark so spreadsheet tools pick the right separator and
//!   encoding
//! - [`to_spreadsheet_markup`]: XML Spreadsheet 2003 workbook with one styled
//!   worksheet
//!
//! Both emit the same nine columns, in the same order.
//!
//! # Quick Start
//!
//! ```rust
//! use eklim_core::{EventTime, FaultDuration, FaultRecord};
//! use eklim_export::to_delimited_text;
//!
//! let record = FaultRecord::new(
//!     1,
//!     EventTime::new(2025, 6, 15, 10, 30, 0).unwrap(),
//!     500,
//!     FaultDuration::from_parts(2, 250).unwrap(),
//!     "0125061510300050002250",
//! )
//! .unwrap()
//! .with_record_index(3);
//!
//! let text = to_delimited_text(&[record]);
//! assert!(text.ends_with(
//!     "\"1\";\"00003\";\"1\";\"Çıkış\";\"Çıkış 1\";\"15/06/2025 10:30:00.500\";\"2.250 sn\";\"2.25\";\"0125061510300050002250\"\n"
//! ));
//! ```

mod delimited;
mod error;
mod row;
mod spreadsheet;

pub use delimited::to_delimited_text;
pub use error::ExportError;
pub use row::HEADERS;
pub use spreadsheet::{to_spreadsheet_markup, SpreadsheetOptions};

pub use eklim_core::FaultRecord;

/// Byte-order mark prefixed to both formats
pub const BOM: &str = "\u{FEFF}";
