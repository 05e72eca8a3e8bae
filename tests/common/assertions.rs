//! Float assertions for interpolated values.
//!
//! Results go through several multiplications and additions, so exact
//! comparison is too strict. Values are compared with an absolute tolerance
//! that grows with the magnitude of the expected value.

#![allow(dead_code)]

/// Default tolerance for values near 1.
pub const DEFAULT_EPSILON: f64 = 1e-9;

fn close(actual: f64, expected: f64, epsilon: f64) -> bool {
    (actual - expected).abs() <= epsilon * expected.abs().max(1.0)
}

/// Assert that `actual` is within tolerance of `expected`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    assert!(
        close(actual, expected, epsilon),
        "{} is not close to {} (epsilon {})",
        actual,
        expected,
        epsilon
    );
}

/// Element-wise [`assert_approx_eq`]; lengths must match.
pub fn assert_array_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    let mismatches: Vec<usize> = actual
        .iter()
        .zip(expected)
        .enumerate()
        .filter(|(_, (a, e))| !close(**a, **e, epsilon))
        .map(|(i, _)| i)
        .collect();
    assert!(
        mismatches.is_empty(),
        "{:?} is not close to {:?} at indices {:?}",
        actual,
        expected,
        mismatches
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(8.0, 7.999999999999999, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
        assert_approx_eq(1000.0, 1000.0000001, None);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, None);
    }

    #[test]
    fn test_assert_array_approx_eq() {
        assert_array_approx_eq(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], None);
        assert_array_approx_eq(&[3.6, 6.8], &[3.5999999999999996, 6.799999999999999], None);
    }
}
