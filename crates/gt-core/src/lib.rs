//! gt-core: stable numeric foundation for gastable.
//!
//! Contains:
//! - numeric (tolerances, float comparison and validation)
//! - sequence (field-value spacing, de-duplication and visiting order)
//! - format (filesystem-safe number strings)
//! - units (bar/torr and celsius/kelvin conversions via uom)
//! - error (shared error types)

pub mod error;
pub mod format;
pub mod numeric;
pub mod sequence;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use format::{clean_number_string, file_safe, number_to_clean_string, percent_token};
pub use numeric::{Tolerances, ensure_finite, ensure_positive, nearly_equal, position_close};
pub use sequence::{
    default_tolerance, linspace, logspace, remove_similar, remove_similar_default, spread_order,
};
