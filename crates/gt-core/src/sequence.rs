//! Sample-point sequences for electric-field grids.
//!
//! Spacing helpers build candidate points, `remove_similar` collapses
//! near-duplicates, and `spread_order` produces the visiting order used when a
//! table is computed one point at a time.

use crate::error::{CoreError, CoreResult};
use crate::numeric::ensure_finite;

/// Divisor applied to the value range to obtain the default similarity tolerance.
pub const DEFAULT_TOLERANCE_DIVISOR: f64 = 20_000.0;

/// `n` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> CoreResult<Vec<f64>> {
    if n < 2 {
        return Err(CoreError::InvalidArg {
            what: "spacing requires at least 2 points",
        });
    }
    ensure_finite(start, "spacing start")?;
    ensure_finite(end, "spacing end")?;

    let step = (end - start) / (n - 1) as f64;
    let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();

    // Ensure exact endpoint
    points[n - 1] = end;
    Ok(points)
}

/// `n` values evenly spaced in log10 space from `start` to `end`.
pub fn logspace(start: f64, end: f64, n: usize) -> CoreResult<Vec<f64>> {
    if start <= 0.0 {
        return Err(CoreError::OutOfRange {
            what: "logarithmic spacing start must be positive",
            value: start,
        });
    }
    if end <= 0.0 {
        return Err(CoreError::OutOfRange {
            what: "logarithmic spacing end must be positive",
            value: end,
        });
    }

    let exponents = linspace(start.log10(), end.log10(), n)?;
    let mut points: Vec<f64> = exponents.into_iter().map(|x| 10f64.powf(x)).collect();
    points[0] = start;
    points[n - 1] = end;
    Ok(points)
}

/// Tolerance adapted to the dynamic range of `values`: `(max - min) / 20000`.
pub fn default_tolerance(values: &[f64]) -> CoreResult<f64> {
    if values.is_empty() {
        return Err(CoreError::InvalidArg {
            what: "cannot derive a tolerance from an empty set",
        });
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        ensure_finite(v, "sequence value")?;
        min = min.min(v);
        max = max.max(v);
    }
    Ok((max - min) / DEFAULT_TOLERANCE_DIVISOR)
}

/// Sort ascending and collapse every value lying within `tolerance` of the
/// last kept value. The first value of each run is the representative.
pub fn remove_similar(values: &[f64], tolerance: f64) -> CoreResult<Vec<f64>> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(CoreError::OutOfRange {
            what: "tolerance must be finite and non-negative",
            value: tolerance,
        });
    }
    for &v in values {
        ensure_finite(v, "sequence value")?;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut result: Vec<f64> = Vec::with_capacity(sorted.len());
    for v in sorted {
        match result.last() {
            Some(&kept) if v - kept <= tolerance => {}
            _ => result.push(v),
        }
    }
    Ok(result)
}

/// `remove_similar` with the range-adaptive default tolerance.
pub fn remove_similar_default(values: &[f64]) -> CoreResult<Vec<f64>> {
    let tolerance = default_tolerance(values)?;
    remove_similar(values, tolerance)
}

/// Reorder values so that each next point is as far as possible from every
/// point already visited (greedy farthest-point traversal).
///
/// Exact duplicates are removed first. Among candidates with the same nearest
/// distance, the one with the higher repeat count wins, where the count is the
/// number of visited points (scanned in visiting order) whose distance equals
/// the running minimum at the moment they are scanned. Remaining ties keep the
/// lowest value. Input values must be finite.
pub fn spread_order(values: &[f64]) -> Vec<f64> {
    let mut remaining = values.to_vec();
    remaining.sort_by(f64::total_cmp);
    remaining.dedup();

    let mut ordered: Vec<f64> = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let mut pick = 0;
        let mut best_distance = 0.0;
        let mut best_repeat = 0usize;

        for (index, &candidate) in remaining.iter().enumerate() {
            let mut min_distance = f64::MAX;
            let mut repeat = 0usize;
            for &visited in &ordered {
                let distance = (candidate - visited).abs();
                if distance < min_distance {
                    min_distance = distance;
                }
                if distance == min_distance {
                    repeat += 1;
                }
            }

            if min_distance > best_distance
                || (min_distance == best_distance && repeat > best_repeat)
            {
                best_distance = min_distance;
                best_repeat = repeat;
                pick = index;
            }
        }

        ordered.push(remaining.remove(pick));
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= 1e-9 * e.abs().max(1.0), "{a} != {e}");
        }
    }

    #[test]
    fn linspace_unit_interval() {
        let points = linspace(0.0, 1.0, 5).unwrap();
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn linspace_keeps_exact_endpoints() {
        let points = linspace(0.1, 0.7, 7).unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], 0.1);
        assert_eq!(points[6], 0.7);
    }

    #[test]
    fn linspace_descending() {
        let points = linspace(10.0, 0.0, 3).unwrap();
        assert_eq!(points, vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn linspace_rejects_single_point() {
        assert!(matches!(
            linspace(0.0, 1.0, 1),
            Err(CoreError::InvalidArg { .. })
        ));
        assert!(linspace(0.0, 1.0, 0).is_err());
    }

    #[test]
    fn logspace_decades() {
        let points = logspace(1.0, 100.0, 5).unwrap();
        assert_close(
            &points,
            &[1.0, 3.1622776601683795, 10.0, 31.622776601683793, 100.0],
        );
    }

    #[test]
    fn logspace_requires_positive_start() {
        assert!(logspace(0.0, 100.0, 5).is_err());
        assert!(logspace(-1.0, 100.0, 5).is_err());
        assert!(logspace(1.0, 100.0, 1).is_err());
    }

    #[test]
    fn default_tolerance_tracks_range() {
        let tol = default_tolerance(&[0.0, 10.0, 20000.0]).unwrap();
        assert!((tol - 1.0).abs() < 1e-12);
        assert!(default_tolerance(&[]).is_err());
    }

    #[test]
    fn remove_similar_collapses_duplicates() {
        let values = [0.0, 10.0, 10.0, 20.0, 20.0, 30.0, 20.0, 30.0];
        assert_eq!(
            remove_similar_default(&values).unwrap(),
            vec![0.0, 10.0, 20.0, 30.0]
        );
        assert_eq!(
            remove_similar(&values, 1e-6).unwrap(),
            vec![0.0, 10.0, 20.0, 30.0]
        );
    }

    #[test]
    fn remove_similar_keeps_first_of_run() {
        let result = remove_similar(&[1.05, 1.0, 2.0, 1.1], 0.06).unwrap();
        assert_eq!(result, vec![1.0, 1.1, 2.0]);
    }

    #[test]
    fn remove_similar_rejects_bad_input() {
        assert!(remove_similar(&[1.0, f64::NAN], 0.1).is_err());
        assert!(remove_similar(&[1.0], -0.1).is_err());
        assert!(remove_similar_default(&[]).is_err());
    }

    #[test]
    fn remove_similar_empty_with_explicit_tolerance() {
        assert!(remove_similar(&[], 0.5).unwrap().is_empty());
    }

    #[test]
    fn spread_order_regression() {
        let values = linspace(0.0, 100.0, 11).unwrap();
        let ordered = spread_order(&values);
        assert_eq!(
            ordered,
            vec![0.0, 100.0, 50.0, 70.0, 30.0, 60.0, 40.0, 80.0, 90.0, 20.0, 10.0]
        );
    }

    #[test]
    fn spread_order_ignores_input_order_and_duplicates() {
        let a = spread_order(&[30.0, 10.0, 20.0, 0.0, 10.0]);
        let b = spread_order(&[0.0, 10.0, 20.0, 30.0]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn spread_order_small_sets() {
        assert!(spread_order(&[]).is_empty());
        assert_eq!(spread_order(&[5.0]), vec![5.0]);
        assert_eq!(spread_order(&[5.0, 1.0]), vec![1.0, 5.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn remove_similar_is_idempotent(values in prop::collection::vec(0.0_f64..1e4, 1..64)) {
            let once = remove_similar_default(&values).unwrap();
            let twice = remove_similar_default(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn remove_similar_output_is_sorted(values in prop::collection::vec(-1e3_f64..1e3, 0..64), tol in 0.0_f64..10.0) {
            let result = remove_similar(&values, tol).unwrap();
            prop_assert!(result.windows(2).all(|w| w[1] - w[0] > tol));
        }

        #[test]
        fn spread_order_is_a_permutation(values in prop::collection::vec(0.0_f64..1e3, 0..40)) {
            let mut ordered = spread_order(&values);
            let mut expected = values.clone();
            expected.sort_by(f64::total_cmp);
            expected.dedup();
            ordered.sort_by(f64::total_cmp);
            prop_assert_eq!(ordered, expected);
        }

        #[test]
        fn spread_order_is_deterministic(values in prop::collection::vec(0.0_f64..1e3, 0..40)) {
            let mut reversed = values.clone();
            reversed.reverse();
            prop_assert_eq!(spread_order(&values), spread_order(&reversed));
        }

        #[test]
        fn linspace_has_requested_length(start in -1e3_f64..1e3, end in -1e3_f64..1e3, n in 2usize..200) {
            let points = linspace(start, end, n).unwrap();
            prop_assert_eq!(points.len(), n);
            prop_assert_eq!(points[0], start);
            prop_assert_eq!(points[n - 1], end);
        }
    }
}
