//! Gas mixture and transport table errors.

use gt_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for gas operations.
pub type GasResult<T> = Result<T, GasError>;

/// Errors raised while building mixtures, running the engine or handling tables.
#[derive(Error, Debug)]
pub enum GasError {
    /// No component survived parsing and zero-fraction filtering.
    #[error("cannot initialize gas with empty components")]
    EmptyMixture,

    /// Engine limit on the number of components.
    #[error("cannot initialize gas with more than {max} components (got {count})")]
    TooManyComponents { count: usize, max: usize },

    /// Names and fractions cannot be paired.
    #[error("number of names ({names}) and fractions ({fractions}) do not match")]
    CountMismatch { names: usize, fractions: usize },

    /// Negative fraction supplied (directly or through inference).
    #[error("negative fraction {value} for component '{name}'")]
    NegativeFraction { name: String, value: f64 },

    /// NaN or infinite fraction.
    #[error("non-finite fraction {value} for component '{name}'")]
    NonFiniteFraction { name: String, value: f64 },

    /// Empty component name.
    #[error("component name must not be empty")]
    EmptyComponentName,

    /// Same component listed twice.
    #[error("component '{name}' listed more than once")]
    DuplicateComponent { name: String },

    /// The engine has no data for this gas.
    #[error("unknown gas component '{name}'")]
    UnknownComponent { name: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Numeric primitive failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Transport engine failure.
    #[error("Engine error: {message}")]
    Engine { message: String },

    /// File could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File exists but is not a valid gas table.
    #[error("invalid gas file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Tables describe different gases or conditions.
    #[error("incompatible gas tables: {reason}")]
    Incompatible { reason: String },

    /// Report serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GasError::Io {
            path: path.into(),
            source,
        }
    }
}
