//! N-dimensional locations in a design space.
//!
//! A [`Location`] maps axis names to coordinates. Missing axes are zero, so
//! `location!(pop = 1)` and `location!(pop = 1, snap = 0)` describe the same
//! point and compare equal. Locations behave like numbers: they can be added,
//! subtracted, scaled and divided, and every operator returns a new location.
//!
//! Coordinates are either plain numbers or *split* pairs (see [`AxisValue`]),
//! which carry different x and y values for anisotropic interpolation.

mod format;
mod ops;
mod value;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MutatorError, Result};

pub use format::{number_to_string, AxisString};
pub use value::{is_near_zero, AxisValue, KeyValue, EPSILON};

/// Build a [`Location`] from `axis = value` pairs.
///
/// ```
/// use mutator_math::location;
///
/// let l = location!(pop = 1, snap = (-100.0, -200.0));
/// assert_eq!(l.to_string(), "<Location pop:1, snap:(-100.000,-200.000) >");
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new()
    };
    ($($axis:ident = $value:expr),+ $(,)?) => {
        $crate::Location::from_tuple([
            $((stringify!($axis), $crate::AxisValue::from($value))),+
        ])
    };
}

/// Where a location sits relative to the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisPlacement {
    /// Every coordinate is zero.
    Origin,
    /// Exactly one coordinate is non-zero.
    OnAxis(String),
    /// Two or more coordinates are non-zero.
    OffAxis,
}

impl AxisPlacement {
    /// The axis name for on-axis placements.
    pub fn axis(&self) -> Option<&str> {
        match self {
            AxisPlacement::OnAxis(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_off_axis(&self) -> bool {
        matches!(self, AxisPlacement::OffAxis)
    }
}

/// Canonical, totally ordered form of a location: its (axis, value) pairs
/// sorted by axis name. Explicit zero coordinates are part of the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationKey(Vec<(String, KeyValue)>);

impl LocationKey {
    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn to_location(&self) -> Location {
        Location::from_tuple(self.0.iter().map(|(name, v)| (name.clone(), AxisValue::from(*v))))
    }
}

/// A point in an n-dimensional design space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location {
    axes: BTreeMap<String, AxisValue>,
}

impl Location {
    /// An empty location, i.e. the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the coordinates from (axis, value) pairs.
    pub fn from_tuple<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AxisValue>,
    {
        Self {
            axes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The coordinates as (axis, value) pairs, sorted by axis name.
    pub fn as_tuple(&self) -> Vec<(String, AxisValue)> {
        self.axes.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub fn as_dict(&self) -> BTreeMap<String, AxisValue> {
        self.axes.clone()
    }

    pub fn key(&self) -> LocationKey {
        LocationKey(self.axes.iter().map(|(k, v)| (k.clone(), v.key())).collect())
    }

    /// Return a copy with one coordinate set.
    pub fn with(mut self, axis: impl Into<String>, value: impl Into<AxisValue>) -> Self {
        self.axes.insert(axis.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, axis: impl Into<String>, value: AxisValue) {
        self.axes.insert(axis.into(), value);
    }

    /// The stored coordinate, if this axis is present.
    pub fn get(&self, axis: &str) -> Option<&AxisValue> {
        self.axes.get(axis)
    }

    /// The coordinate on `axis`, zero when the axis is absent.
    pub fn value(&self, axis: &str) -> AxisValue {
        self.axes.get(axis).copied().unwrap_or_default()
    }

    /// The scalar coordinate on `axis` (the x side of split values), zero when absent.
    pub fn coordinate(&self, axis: &str) -> f64 {
        self.value(axis).x()
    }

    pub fn contains(&self, axis: &str) -> bool {
        self.axes.contains_key(axis)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AxisValue)> {
        self.axes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Fill in zero for every axis in `axis_names` that is not present.
    pub fn expand<I, S>(&mut self, axis_names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in axis_names {
            let name = name.as_ref();
            if !self.axes.contains_key(name) {
                self.axes.insert(name.to_string(), AxisValue::Scalar(0.0));
            }
        }
    }

    /// Remove coordinates that are zero, the opposite of [`Location::expand`].
    pub fn strip(&self) -> Location {
        Location {
            axes: self
                .axes
                .iter()
                .filter(|(_, v)| !v.is_zero())
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    /// Restrict both locations to the axes present in both, dropping axes
    /// where both are zero. Returns `None` when nothing is left.
    pub fn common(&self, other: &Location) -> Option<(Location, Location)> {
        let mut new_self = Location::new();
        let mut new_other = Location::new();
        for (dim, sd) in &self.axes {
            let Some(od) = other.axes.get(dim) else {
                continue;
            };
            if sd.is_zero() && od.is_zero() {
                continue;
            }
            new_self.insert(dim.clone(), *sd);
            new_other.insert(dim.clone(), *od);
        }
        if new_self.is_empty() {
            None
        } else {
            Some((new_self, new_other))
        }
    }

    /// True if every coordinate is within epsilon of zero.
    ///
    /// Each axis is checked on its own, so several sub-epsilon coordinates
    /// still make an origin even when their euclidean length is not below
    /// epsilon.
    pub fn is_origin(&self) -> bool {
        self.axes.values().all(AxisValue::is_zero)
    }

    /// Classify the location as origin, on a single axis, or off-axis.
    ///
    /// Only meaningful for locations already expressed relative to a bias.
    pub fn is_on_axis(&self) -> AxisPlacement {
        let stripped = self.strip();
        let mut dims = stripped.axes.into_keys();
        match (dims.next(), dims.next()) {
            (None, _) => AxisPlacement::Origin,
            (Some(name), None) => AxisPlacement::OnAxis(name),
            (Some(_), Some(_)) => AxisPlacement::OffAxis,
        }
    }

    /// True if any coordinate is split.
    pub fn is_ambivalent(&self) -> bool {
        self.axes.values().any(AxisValue::is_split)
    }

    /// True if the coordinate on `axis` is split. Absent axes are zero, so never split.
    pub fn is_ambivalent_on(&self, axis: &str) -> bool {
        self.axes.get(axis).is_some_and(AxisValue::is_split)
    }

    /// Split an ambivalent location into its x and y locations.
    pub fn split(&self) -> (Location, Location) {
        (self.splice_x(), self.splice_y())
    }

    /// A copy that takes the x side of every split coordinate.
    pub fn splice_x(&self) -> Location {
        Location {
            axes: self
                .axes
                .iter()
                .map(|(k, v)| (k.clone(), AxisValue::Scalar(v.x())))
                .collect(),
        }
    }

    /// A copy that takes the y side of every split coordinate.
    pub fn splice_y(&self) -> Location {
        Location {
            axes: self
                .axes
                .iter()
                .map(|(k, v)| (k.clone(), AxisValue::Scalar(v.y())))
                .collect(),
        }
    }

    /// Euclidean distance to `other` over the union of both axis sets.
    ///
    /// Split coordinates contribute the larger of their two per-side differences.
    pub fn distance(&self, other: &Location) -> f64 {
        let names: BTreeSet<&str> = self.axis_names().chain(other.axis_names()).collect();
        names
            .into_iter()
            .map(|name| {
                let (a, b) = (self.value(name), other.value(name));
                let dx = b.x() - a.x();
                let dy = b.y() - a.y();
                (dx * dx).max(dy * dy)
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn distance_to_origin(&self) -> f64 {
        self.distance(&Location::new())
    }

    /// True when both locations are within epsilon of each other.
    pub fn same_as(&self, other: &Location) -> bool {
        self.distance(other) < EPSILON
    }

    /// Sorted names of the axes whose coordinate is not exactly zero.
    pub fn get_active_axes(&self) -> Vec<String> {
        self.axes
            .iter()
            .filter(|(_, v)| !v.is_exact_zero())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Apply `(value + offset) * scale` per axis.
    ///
    /// The result only carries the axes named in `transforms`. Without a
    /// transform the location is returned unchanged.
    pub fn transform(&self, transforms: Option<&BTreeMap<String, (f64, f64)>>) -> Location {
        let Some(transforms) = transforms else {
            return self.clone();
        };
        Location {
            axes: transforms
                .iter()
                .map(|(dim, &(offset, scale))| {
                    (dim.clone(), self.value(dim).map(|v| (v + offset) * scale))
                })
                .collect(),
        }
    }

    /// Fail on coordinates that are not finite numbers.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in &self.axes {
            if !value.is_finite() {
                return Err(MutatorError::MalformedLocation {
                    axis: axis.clone(),
                    value: format!("{:?}", value),
                });
            }
        }
        Ok(())
    }

    /// Deterministic ordering: fewer axes first, then the sorted
    /// (axis, value) pairs compared lexicographically.
    pub fn sort_cmp(&self, other: &Location) -> Ordering {
        self.len().cmp(&other.len()).then_with(|| {
            for ((ka, va), (kb, vb)) in self.axes.iter().zip(other.axes.iter()) {
                let ord = ka.cmp(kb).then_with(|| va.sort_cmp(vb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        })
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.axis_names()
            .chain(other.axis_names())
            .all(|name| self.value(name).approx_eq(&other.value(name)))
    }
}

impl<K: Into<String>, V: Into<AxisValue>> FromIterator<(K, V)> for Location {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Location::from_tuple(iter)
    }
}

impl<'a> IntoIterator for &'a Location {
    type Item = (&'a String, &'a AxisValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AxisValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.axes.iter()
    }
}
