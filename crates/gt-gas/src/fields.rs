//! Electric-field set construction.
//!
//! A field set is assembled from explicit values and any number of linear or
//! logarithmic ranges, then sorted and cleaned of near-duplicates. The set
//! remembers how many points each spacing policy requested so output file
//! names can describe it.

use crate::error::{GasError, GasResult};
use gt_core::numeric::{Tolerances, ensure_finite, nearly_equal};
use gt_core::sequence::{default_tolerance, linspace, logspace, remove_similar, spread_order};
use std::fmt;

/// Type of range progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Upper bound on the points one range may request.
pub const MAX_RANGE_POINTS: usize = 100_000;

/// A spaced range of field values [V/cm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub start: f64,
    pub end: f64,
    pub points: usize,
    pub spacing: Spacing,
}

impl FieldRange {
    pub fn linear(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Linear,
        }
    }

    pub fn logarithmic(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Logarithmic,
        }
    }

    /// Generate all points in the range.
    pub fn generate_points(&self) -> GasResult<Vec<f64>> {
        if self.points > MAX_RANGE_POINTS {
            return Err(GasError::InvalidArg {
                what: "field range requests more than 100000 points",
            });
        }
        let points = match self.spacing {
            Spacing::Linear => linspace(self.start, self.end, self.points)?,
            Spacing::Logarithmic => logspace(self.start, self.end, self.points)?,
        };
        Ok(points)
    }
}

/// Requested field values before cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSetSpec {
    pub explicit: Vec<f64>,
    pub ranges: Vec<FieldRange>,
    /// Similarity tolerance; defaults to `(max - min) / 20000`.
    pub tolerance: Option<f64>,
}

impl FieldSetSpec {
    pub fn explicit(values: Vec<f64>) -> Self {
        Self {
            explicit: values,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, range: FieldRange) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    fn requested_points(&self, spacing: Spacing) -> Option<usize> {
        let mut total = None;
        for range in self.ranges.iter().filter(|r| r.spacing == spacing) {
            *total.get_or_insert(0) += range.points;
        }
        total
    }

    /// Concatenate all sources, validate and remove near-duplicates.
    pub fn build(&self) -> GasResult<FieldSet> {
        let mut values = self.explicit.clone();
        for range in &self.ranges {
            values.extend(range.generate_points()?);
        }

        if values.is_empty() {
            return Err(GasError::InvalidArg {
                what: "no electric field values requested",
            });
        }
        validate_fields(&values)?;

        let tolerance = match self.tolerance {
            Some(tolerance) => tolerance,
            None => default_tolerance(&values)?,
        };

        Ok(FieldSet {
            values: remove_similar(&values, tolerance)?,
            tolerance,
            linear_points: self.requested_points(Spacing::Linear),
            log_points: self.requested_points(Spacing::Logarithmic),
        })
    }
}

/// Sorted, de-duplicated electric-field values [V/cm].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    values: Vec<f64>,
    tolerance: f64,
    linear_points: Option<usize>,
    log_points: Option<usize>,
}

impl FieldSet {
    /// Field set from literal values only.
    pub fn from_values(values: &[f64]) -> GasResult<Self> {
        FieldSetSpec::explicit(values.to_vec()).build()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Tolerance used to collapse near-duplicates.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Points requested through linear ranges, if any.
    pub fn linear_points(&self) -> Option<usize> {
        self.linear_points
    }

    /// Points requested through logarithmic ranges, if any.
    pub fn log_points(&self) -> Option<usize> {
        self.log_points
    }

    /// Visiting order for point-by-point generation.
    pub fn spread_order(&self) -> Vec<f64> {
        spread_order(&self.values)
    }

    /// Whether `value` is already represented by one of `computed` under the
    /// same similarity rule used to build the set.
    pub fn is_covered(&self, value: f64, computed: &[f64]) -> bool {
        computed.iter().any(|&c| {
            (c - value).abs() <= self.tolerance || nearly_equal(c, value, Tolerances::GRID_MATCH)
        })
    }

    /// Values of this set not yet present in `computed`, in set order.
    pub fn missing_from(&self, computed: &[f64]) -> Vec<f64> {
        self.values
            .iter()
            .copied()
            .filter(|&v| !self.is_covered(v, computed))
            .collect()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "{} field values from {} to {} V/cm",
                self.len(),
                first,
                last
            ),
            _ => write!(f, "empty field set"),
        }
    }
}

fn validate_fields(values: &[f64]) -> GasResult<()> {
    for &v in values {
        let v = ensure_finite(v, "electric field")?;
        if v < 0.0 {
            return Err(GasError::InvalidArg {
                what: "electric field values must be non-negative",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_sorted_and_deduplicated() {
        let set = FieldSet::from_values(&[300.0, 100.0, 200.0, 100.0]).unwrap();
        assert_eq!(set.values(), &[100.0, 200.0, 300.0]);
        assert_eq!(set.linear_points(), None);
        assert_eq!(set.log_points(), None);
    }

    #[test]
    fn combined_policies() {
        let set = FieldSetSpec::explicit(vec![50.0])
            .with_range(FieldRange::linear(0.0, 1000.0, 11))
            .with_range(FieldRange::logarithmic(1.0, 1000.0, 4))
            .build()
            .unwrap();
        // 0..1000 step 100 plus 1, 10, 50 (100 and 1000 shared)
        assert_eq!(set.len(), 14);
        assert_eq!(set.first(), Some(0.0));
        assert_eq!(set.last(), Some(1000.0));
        assert_eq!(set.linear_points(), Some(11));
        assert_eq!(set.log_points(), Some(4));
    }

    #[test]
    fn near_duplicates_collapsed() {
        let set = FieldSet::from_values(&[0.0, 1000.0, 1000.01, 500.0]).unwrap();
        assert_eq!(set.values(), &[0.0, 500.0, 1000.0]);
    }

    #[test]
    fn invalid_sets_rejected() {
        assert!(FieldSet::from_values(&[]).is_err());
        assert!(FieldSet::from_values(&[-1.0, 10.0]).is_err());
        assert!(FieldSet::from_values(&[f64::INFINITY]).is_err());
        assert!(
            FieldSetSpec::default()
                .with_range(FieldRange::linear(0.0, 10.0, 1))
                .build()
                .is_err()
        );
        assert!(
            FieldSetSpec::default()
                .with_range(FieldRange::logarithmic(0.0, 10.0, 5))
                .build()
                .is_err()
        );
    }

    #[test]
    fn oversized_range_rejected() {
        let spec = FieldSetSpec::default().with_range(FieldRange::linear(0.0, 1.0, usize::MAX));
        assert!(matches!(spec.build(), Err(GasError::InvalidArg { .. })));
        let spec = FieldSetSpec::default()
            .with_range(FieldRange::logarithmic(1.0, 10.0, MAX_RANGE_POINTS + 1));
        assert!(spec.build().is_err());
    }

    #[test]
    fn missing_values_for_resume() {
        let set = FieldSetSpec::default()
            .with_range(FieldRange::linear(0.0, 100.0, 11))
            .build()
            .unwrap();
        let computed = [0.0, 50.0000001, 100.0];
        let missing = set.missing_from(&computed);
        assert_eq!(missing.len(), 8);
        assert!(!missing.contains(&50.0));
        assert!(missing.contains(&10.0));
    }

    #[test]
    fn single_value_set() {
        let set = FieldSet::from_values(&[250.0]).unwrap();
        assert_eq!(set.tolerance(), 0.0);
        assert!(set.is_covered(250.0, &[250.0]));
        assert!(!set.is_covered(250.0, &[251.0]));
    }

    #[test]
    fn display_summary() {
        let set = FieldSet::from_values(&[100.0, 200.0]).unwrap();
        assert_eq!(set.to_string(), "2 field values from 100 to 200 V/cm");
    }
}
