//! Shared application service layer for gastable.
//!
//! Request/response services behind the `gas-cli` subcommands: table
//! generation (batch or resumable point-by-point), reading and merging gas
//! files, and packaging outputs.

pub mod error;
pub mod generate_service;
pub mod merge_service;
pub mod package;
pub mod progress;
pub mod read_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use generate_service::{
    GenerateMode, GenerateRequest, GenerateResponse, OutputTarget, generate, generate_with_progress,
};
pub use merge_service::{MergeRequest, MergeResponse, merge_files};
pub use package::create_tarball;
pub use progress::{GenerateProgressEvent, GenerateStage, PointProgress};
pub use read_service::{ReadRequest, read_report};
