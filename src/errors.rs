//! Defines the custom error types for the application.
//!
//! Every variant is terminal for the invocation; the binary maps all of
//! them to a non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Schema Error: {0}")]
    Schema(String),

    #[error("Write Error: could not write {} - {}", .1.display(), .0)]
    Write(#[source] std::io::Error, PathBuf),

    #[error("I/O Error: {1} - {0}")]
    Io(#[source] std::io::Error, String),

    #[error("Schema Loading Error: {0}")]
    SchemaLoad(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl ConverterError {
    /// Classifies a failed read of `path`, keeping "missing" apart from
    /// every other I/O failure.
    pub fn from_read(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConverterError::FileNotFound(path.to_path_buf())
        } else {
            ConverterError::Io(err, format!("Failed to read {}", path.display()))
        }
    }
}
