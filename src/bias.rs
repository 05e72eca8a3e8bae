//! Bias selection.
//!
//! The bias is the location that becomes the origin of the interpolation
//! system. Picking it is a heuristic: we look for the master that makes as
//! many other masters as possible lie on a single axis once everything is
//! translated by it. The tie-break rules are part of the contract, because
//! builds have to be reproducible.

use std::collections::BTreeMap;

use tracing::debug;

use crate::location::{AxisPlacement, AxisValue, Location};

/// The most frequent value in `values`; ties go to the value that appears first.
///
/// Returns `None` for an empty slice.
pub fn most_common(values: &[f64]) -> Option<f64> {
    let mut best: Option<(usize, usize, f64)> = None; // (count, first index, value)
    for (i, &v) in values.iter().enumerate() {
        if values[..i].contains(&v) {
            continue;
        }
        let count = values.iter().filter(|&&o| o == v).count();
        match best {
            Some((best_count, _, _)) if best_count >= count => {}
            _ => best = Some((count, i, v)),
        }
    }
    best.map(|(_, _, v)| v)
}

fn prefer_origin(mut candidates: Vec<Location>) -> Location {
    if let Some(origin) = candidates.iter().find(|c| c.is_origin()) {
        return origin.clone();
    }
    candidates.sort_by(Location::sort_cmp);
    candidates.into_iter().next().unwrap_or_default()
}

/// Find the location that translates the whole system to the origin.
///
/// 1. Per axis, take the most common value (if it occurs more than once) to
///    form a candidate.
/// 2. An input with exactly the candidate's axes and values wins.
/// 3. Otherwise inputs that carry every candidate axis with the candidate's
///    value compete: the origin if present, else the first in sort order.
/// 4. Otherwise every input is tried as bias and the one leaving the fewest
///    off-axis locations wins, again preferring the origin, then sort order.
///
/// An empty input yields the origin.
pub fn bias_from_locations(locations: &[Location]) -> Location {
    let mut locs = locations.to_vec();
    locs.sort_by(Location::sort_cmp);

    let mut dims: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for l in &locs {
        for (d, v) in l.iter() {
            let values = dims.entry(d).or_default();
            match *v {
                AxisValue::Scalar(x) => values.push(x),
                AxisValue::Split(x, y) => {
                    values.push(x);
                    values.push(y);
                }
            }
        }
    }

    let mut candidate = Location::new();
    for (k, values) in dims.iter_mut() {
        values.sort_by(f64::total_cmp);
        if let Some(v) = most_common(values) {
            if values.iter().filter(|&&o| o == v).count() > 1 {
                candidate.insert(*k, AxisValue::Scalar(v));
            }
        }
    }
    debug!(candidate = %candidate, "Bias candidate");

    // Both steps compare explicit coordinates exactly: an absent axis does
    // not match a zero in the candidate.
    let candidate_key = candidate.key();
    if let Some(exact) = locs.iter().find(|l| l.key() == candidate_key) {
        return exact.clone();
    }

    let mut matches: Vec<Location> = Vec::new();
    for l in &locs {
        let agrees = candidate.iter().all(|(k, v)| match (l.get(k), v) {
            (Some(AxisValue::Scalar(a)), AxisValue::Scalar(b)) => a == b,
            _ => false,
        });
        if agrees && !matches.iter().any(|m| m.key() == l.key()) {
            matches.push(l.clone());
        }
    }
    if !matches.is_empty() {
        return prefer_origin(matches);
    }

    // Nothing matches the candidate: score every input as a bias.
    let mut results: BTreeMap<usize, Vec<Location>> = BTreeMap::new();
    for bias in &locs {
        let off_axis = locs
            .iter()
            .filter(|l| (*l - bias).is_on_axis() == AxisPlacement::OffAxis)
            .count();
        results.entry(off_axis).or_default().push(bias.clone());
    }
    match results.into_iter().next() {
        Some((_, candidates)) => prefer_origin(candidates),
        None => Location::new(),
    }
}

/// Rank locations for patching.
///
/// Returns, in input order:
/// 1. on-axis locations,
/// 2. off-axis locations that share at least one coordinate with an on-axis
///    location on the same axis ("projecting"),
/// 3. the remaining "wild" off-axis locations.
///
/// Origin locations are left out.
pub fn sort_locations(locations: &[Location]) -> (Vec<Location>, Vec<Location>, Vec<Location>) {
    let mut on_axis = Vec::new();
    let mut on_axis_values: BTreeMap<&str, Vec<AxisValue>> = BTreeMap::new();
    let mut off_axis = Vec::new();
    for l in locations {
        if l.is_origin() {
            continue;
        }
        match l.is_on_axis() {
            AxisPlacement::OnAxis(_) => {
                on_axis.push(l.clone());
                for (axis, value) in l.iter() {
                    on_axis_values.entry(axis).or_default().push(*value);
                }
            }
            _ => off_axis.push(l),
        }
    }
    let (projecting, wild): (Vec<&Location>, Vec<&Location>) =
        off_axis.into_iter().partition(|l| {
            l.iter().any(|(axis, value)| {
                on_axis_values
                    .get(axis)
                    .is_some_and(|values| values.contains(value))
            })
        });
    (
        on_axis,
        projecting.into_iter().cloned().collect(),
        wild.into_iter().cloned().collect(),
    )
}
