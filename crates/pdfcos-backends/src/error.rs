//! Error types for the engine adapter layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides
//! [`BackendError`] that wraps engine-specific errors and converts them to
//! [`PdfError`] for unified reporting. Note that the object contract itself
//! never returns these: accessors degrade to defaults and log; hard errors
//! only occur when opening a document.

use pdfcos_core::PdfError;
use thiserror::Error;

/// Error type for PDF engine operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine-reported failure outside of parsing.
    #[error("engine error: {0}")]
    Engine(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Engine(msg) => PdfError::Other(msg),
            BackendError::Core(e) => e,
        }
    }
}
