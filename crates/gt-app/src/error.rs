//! Error types for the gt-app service layer.

use gt_gas::GasError;
use std::path::PathBuf;

/// Application error wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Gas(#[from] GasError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to create output directory: {path}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Packaging failed: {message}")]
    Package { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gt-app operations.
pub type AppResult<T> = Result<T, AppError>;
