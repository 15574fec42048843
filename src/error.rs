//! Error types for prosemark library.
//!
//! Classification, numbering and structuring never fail: ambiguous input
//! degrades to a weaker classification instead. Errors are reserved for the
//! collaborator boundaries (reading input, validating options, writing output).

use std::io;
use thiserror::Error;

/// Result type alias for prosemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the edges of the processing pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No reader is registered for the input format.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The input container could not be read as text.
    #[error("Unreadable input: {0}")]
    UnreadableInput(String),

    /// A formatting option is out of range or malformed.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error while producing output (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error originated at the input side of the pipeline.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::UnreadableInput(_)
        )
    }
}
