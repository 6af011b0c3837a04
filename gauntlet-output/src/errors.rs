//! Output error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Serialization failed for {format}: {error}")]
    Serialization { format: String, error: String },

    #[error("Filesystem error at {path} during {operation}: {error}")]
    Filesystem {
        path: String,
        operation: String,
        error: String,
    },

    #[error("Failed to write to stdout: {0}")]
    Stdout(#[from] std::io::Error),

    #[error("Unknown report format '{0}'. Supported formats are: table, markdown, json")]
    UnknownFormat(String),
}
