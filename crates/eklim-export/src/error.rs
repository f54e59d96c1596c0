//! Export errors

use eklim_core::FaultError;
use thiserror::Error;

/// Errors that can occur while writing spreadsheet markup
#[derive(Debug, Error)]
pub enum ExportError {
    /// Markup writer error
    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error from the underlying buffer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for FaultError {
    fn from(err: ExportError) -> Self {
        FaultError::Export(err.to_string())
    }
}
