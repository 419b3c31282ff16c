/// CLI error types
use clipkit_importer::ImportError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured error object printed for fatal failures
pub fn error_json(message: &str) -> serde_json::Value {
    json!({
        "success": false,
        "error": message,
    })
}
