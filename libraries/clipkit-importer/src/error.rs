//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("No files specified")]
    NoFiles,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("File verification failed: {0}")]
    Verification(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<tempfile::PersistError> for ImportError {
    fn from(err: tempfile::PersistError) -> Self {
        ImportError::Io(err.error)
    }
}
