//! Float comparison and validation helpers.

use crate::{CoreError, CoreResult};

/// Combined absolute/relative comparison bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    /// Tight bounds for normalized quantities such as mixture fractions.
    fn default() -> Self {
        Self::TIGHT
    }
}

impl Tolerances {
    pub const TIGHT: Tolerances = Tolerances {
        abs: 1e-12,
        rel: 1e-9,
    };

    /// Two field grid points describe the same sample.
    pub const GRID_MATCH: Tolerances = Tolerances {
        abs: 1e-20,
        rel: 1e-6,
    };
}

/// `|a - b| <= abs` or `|a - b| <= rel * max(|a|, |b|)`.
pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Index of the first entry of `values` nearly equal to `target`.
pub fn position_close(values: &[f64], target: f64, tol: Tolerances) -> Option<usize> {
    values.iter().position(|&v| nearly_equal(v, target, tol))
}

pub fn ensure_finite(value: f64, what: &'static str) -> CoreResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(value: f64, what: &'static str) -> CoreResult<f64> {
    let value = ensure_finite(value, what)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CoreError::OutOfRange { what, value })
    }
}
