//! Weighting rules for deltas.
//!
//! Every delta contributes `factor * value` to an instance. On-axis deltas
//! follow a 1-D piecewise-linear curve along their own axis; off-axis deltas
//! are weighted per shared axis from the bracketing [`Limits`] and the
//! per-axis ratios are multiplied.

use crate::location::{Location, EPSILON};

use super::limits::Limits;

/// Weight of an on-axis delta at coordinate `v` for a query at `f`.
///
/// `index` holds the sorted, distinct coordinates of all on-axis deltas on
/// this axis, the origin included. Exact hits snap to their delta; between
/// two known coordinates the bracketing pair shares the weight; outside the
/// known range the two outermost deltas extrapolate.
pub fn on_axis_factor(f: f64, v: f64, index: &[f64]) -> f64 {
    let mut below = Vec::new();
    let mut above = Vec::new();
    let mut exact = false;
    for &value in index {
        if value < f {
            below.push(value);
        } else if value > f {
            above.push(value);
        } else {
            exact = true;
        }
    }
    below.sort_by(f64::total_cmp);
    above.sort_by(f64::total_cmp);

    if exact {
        return if (f - EPSILON < v && f + EPSILON > v) || f == v {
            1.0
        } else {
            0.0
        };
    }
    match (below.last().copied(), above.first().copied()) {
        (Some(m_b), Some(m_a)) => {
            if v < m_b || v > m_a {
                0.0
            } else if v == m_a {
                (f - m_b) / (m_a - m_b)
            } else {
                (f - m_a) / (m_b - m_a)
            }
        }
        (None, Some(_)) => match above.as_slice() {
            [a0, a1, ..] if v == *a1 => (f - a0) / (a1 - a0),
            [a0, a1, ..] if v == *a0 => (f - a1) / (a0 - a1),
            _ => 0.0,
        },
        (Some(_), None) => match below.as_slice() {
            [.., b0, b1] if v == *b0 => (f - b1) / (b0 - b1),
            [.., b0, b1] if v == *b1 => (f - b0) / (b1 - b0),
            _ => 0.0,
        },
        (None, None) => 0.0,
    }
}

/// Weight of an off-axis delta at `delta` for a query at `query`.
///
/// Both locations must already be expanded to the same axes. The result is
/// the product of one ratio per axis in `limits`, taken in axis name order.
pub fn off_axis_factor(query: &Location, delta: &Location, limits: &Limits) -> f64 {
    limits
        .iter()
        .map(|(dim, limit)| {
            let f = query.coordinate(dim);
            let v = delta.coordinate(dim);
            axis_ratio(f, v, limit.lower, limit.middle, limit.upper)
        })
        .product()
}

fn axis_ratio(f: f64, v: f64, m_b: Option<f64>, m: Option<f64>, m_a: Option<f64>) -> f64 {
    if m_a.is_some_and(|m_a| v > m_a) || m_b.is_some_and(|m_b| v < m_b) {
        return 0.0;
    }
    if f < v - EPSILON {
        match (m_b, m, m_a) {
            // extrapolating below the lowest bracket
            (None, Some(m), Some(m_a)) => {
                let r = (f - m_a).abs() / (m - m_a).abs();
                if v == m {
                    r
                } else {
                    1.0 - r
                }
            }
            (None, _, _) | (_, _, None) => 0.0,
            (Some(m_b), _, Some(m_a)) => (f - m_b) / (m_a - m_b),
        }
    } else if f > v + EPSILON {
        match (m_b, m, m_a) {
            (None, _, _) => 0.0,
            // extrapolating above the highest bracket
            (Some(m_b), Some(m), None) => {
                let r = (f - m_b).abs() / (m_b - m).abs();
                if v == m {
                    r
                } else {
                    1.0 - r
                }
            }
            (Some(_), None, None) => 0.0,
            (Some(m_b), _, Some(m_a)) => (m_a - f) / (m_a - m_b),
        }
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::limits::Limit;
    use crate::location;
    use std::collections::BTreeMap;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_on_axis_interpolation() {
        let index = [0.0, 1.0];
        assert!(approx(on_axis_factor(0.5, 1.0, &index), 0.5));
        assert!(approx(on_axis_factor(0.25, 1.0, &index), 0.25));
        assert!(approx(on_axis_factor(0.25, 0.0, &index), 0.75));
    }

    #[test]
    fn test_on_axis_exact_hits() {
        let index = [0.0, 1.0, 2.0];
        assert_eq!(on_axis_factor(1.0, 1.0, &index), 1.0);
        assert_eq!(on_axis_factor(1.0, 2.0, &index), 0.0);
        assert_eq!(on_axis_factor(0.0, 1.0, &index), 0.0);
    }

    #[test]
    fn test_on_axis_only_bracketing_pair_counts() {
        let index = [0.0, 1.0, 2.0, 4.0];
        assert!(approx(on_axis_factor(3.0, 4.0, &index), 0.5));
        assert!(approx(on_axis_factor(3.0, 2.0, &index), 0.5));
        assert_eq!(on_axis_factor(3.0, 1.0, &index), 0.0);
    }

    #[test]
    fn test_on_axis_extrapolation() {
        let index = [0.0, 1.0];
        // above the highest value
        assert!(approx(on_axis_factor(2.0, 1.0, &index), 2.0));
        assert!(approx(on_axis_factor(2.0, 0.0, &index), -1.0));
        // below the lowest value
        assert!(approx(on_axis_factor(-1.0, 1.0, &index), -1.0));
        assert!(approx(on_axis_factor(-1.5, 1.0, &index), -1.5));
        assert!(approx(on_axis_factor(-1.0, 0.0, &index), 2.0));
    }

    #[test]
    fn test_on_axis_degenerate_index() {
        assert_eq!(on_axis_factor(2.0, 1.0, &[1.0]), 0.0);
        assert_eq!(on_axis_factor(2.0, 1.0, &[]), 0.0);
    }

    #[test]
    fn test_off_axis_inside_bracket() {
        let mut limits = BTreeMap::new();
        limits.insert("pop".to_string(), Limit { lower: Some(0.0), middle: None, upper: Some(1.0) });
        limits.insert("snap".to_string(), Limit { lower: Some(0.0), middle: None, upper: Some(1.0) });
        let query = location!(pop = 0.5, snap = 0.5);
        let delta = location!(pop = 1, snap = 1);
        assert!(approx(off_axis_factor(&query, &delta, &limits), 0.25));
    }

    #[test]
    fn test_off_axis_outside_envelope() {
        let mut limits = BTreeMap::new();
        limits.insert("pop".to_string(), Limit { lower: Some(0.0), middle: None, upper: Some(1.0) });
        let query = location!(pop = 0.5, snap = 0.5);
        let delta = location!(pop = 2, snap = 1);
        assert_eq!(off_axis_factor(&query, &delta, &limits), 0.0);
    }

    #[test]
    fn test_off_axis_extrapolation_above() {
        let mut limits = BTreeMap::new();
        limits.insert("pop".to_string(), Limit { lower: Some(0.0), middle: Some(1.0), upper: None });
        limits.insert("snap".to_string(), Limit { lower: Some(0.0), middle: Some(1.0), upper: None });
        let query = location!(pop = 2, snap = 2);
        let delta = location!(pop = 1, snap = 1);
        assert!(approx(off_axis_factor(&query, &delta, &limits), 4.0));
    }

    #[test]
    fn test_off_axis_on_the_delta() {
        let limits = BTreeMap::from([(
            "pop".to_string(),
            Limit { lower: None, middle: Some(1.0), upper: None },
        )]);
        let query = location!(pop = 1, snap = 1);
        assert_eq!(off_axis_factor(&query, &query, &limits), 1.0);
        assert_eq!(off_axis_factor(&query, &query, &BTreeMap::new()), 1.0);
    }
}
