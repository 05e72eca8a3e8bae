//! Bracketing values around a query, per axis.
//!
//! Off-axis deltas are weighted by where the query sits between the nearest
//! known coordinates on each axis it shares with other deltas. [`get_limits`]
//! collects those coordinates once per query.

use std::collections::BTreeMap;

use crate::location::{Location, EPSILON};

/// The bracket found on one axis.
///
/// `lower` and `upper` are the nearest known coordinates below and above the
/// query. `middle` is set when a known coordinate coincides with the query,
/// or when the query lies outside every known coordinate: then `middle` and
/// one of the bounds are the two values closest to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Limit {
    pub lower: Option<f64>,
    pub middle: Option<f64>,
    pub upper: Option<f64>,
}

impl Limit {
    fn new(lower: Option<f64>, middle: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            lower,
            middle,
            upper,
        }
    }
}

/// Limits by axis name.
pub type Limits = BTreeMap<String, Limit>;

#[derive(Default)]
struct Buckets {
    below: Vec<f64>,
    equal: Vec<f64>,
    above: Vec<f64>,
}

fn push_unique(values: &mut Vec<f64>, value: f64) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl Buckets {
    /// Every axis starts out with the origin classified against the query.
    fn seeded(current: f64) -> Self {
        let mut buckets = Buckets::default();
        if current > 0.0 {
            buckets.below.push(0.0);
        } else if current < 0.0 {
            buckets.above.push(0.0);
        } else {
            buckets.equal.push(0.0);
        }
        buckets
    }

    fn classify(&mut self, current: f64, value: f64) {
        if current < value - EPSILON {
            push_unique(&mut self.above, value);
        } else if current > value + EPSILON {
            push_unique(&mut self.below, value);
        } else {
            push_unique(&mut self.equal, value);
        }
    }

    fn resolve(mut self) -> Option<Limit> {
        self.below.sort_by(f64::total_cmp);
        self.above.sort_by(f64::total_cmp);
        let less = &self.below;
        let more = &self.above;
        let equal = self.equal.first().copied();
        match (less.last().copied(), more.first().copied()) {
            (None, Some(_)) => {
                if equal.is_some() {
                    Some(Limit::new(None, equal, None))
                } else if more.len() > 1 {
                    // below every known value
                    Some(Limit::new(None, Some(more[0]), Some(more[1])))
                } else {
                    None
                }
            }
            (Some(_), None) => {
                if equal.is_some() {
                    Some(Limit::new(None, equal, None))
                } else if less.len() > 1 {
                    // above every known value
                    let n = less.len();
                    Some(Limit::new(Some(less[n - 2]), Some(less[n - 1]), None))
                } else {
                    None
                }
            }
            (lim_min, lim_max) => {
                if equal.is_some() {
                    Some(Limit::new(None, equal, None))
                } else {
                    Some(Limit::new(lim_min, None, lim_max))
                }
            }
        }
    }
}

/// Find, for each axis `current` shares with any of `locations`, the values
/// that bracket `current` on that axis.
///
/// Only axes explicitly present in both `current` and a location count, and
/// axes where both are zero are skipped.
pub fn get_limits(locations: &[Location], current: &Location) -> Limits {
    let mut buckets: BTreeMap<String, Buckets> = BTreeMap::new();
    for l in locations {
        let Some((a, b)) = current.common(l) else {
            continue;
        };
        for (name, value) in b.iter() {
            let f = a.coordinate(name);
            buckets
                .entry(name.to_string())
                .or_insert_with(|| Buckets::seeded(f))
                .classify(current.coordinate(name), value.x());
        }
    }
    buckets
        .into_iter()
        .filter_map(|(name, b)| b.resolve().map(|limit| (name, limit)))
        .collect()
}
