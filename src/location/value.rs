//! Coordinate values stored on a single axis.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tolerance for every near-zero and near-equal comparison in the crate.
pub const EPSILON: f64 = f64::EPSILON;

/// Returns true when `value` lies strictly within [`EPSILON`] of zero.
#[inline]
pub fn is_near_zero(value: f64) -> bool {
    -EPSILON < value && value < EPSILON
}

/// A coordinate on one axis.
///
/// A `Split` value carries two coordinates for the same nominal position: the
/// first is used when resolving horizontal (x) data, the second for vertical
/// (y) data. This is what makes anisotropic interpolation possible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// Plain coordinate
    Scalar(f64),
    /// Ambivalent coordinate: (x, y)
    Split(f64, f64),
}

impl AxisValue {
    /// Build a value from two sides, collapsing to a scalar when they are
    /// exactly equal.
    pub fn pair(x: f64, y: f64) -> Self {
        if x == y {
            AxisValue::Scalar(x)
        } else {
            AxisValue::Split(x, y)
        }
    }

    /// The x side of the value. Scalars return themselves.
    pub fn x(&self) -> f64 {
        match *self {
            AxisValue::Scalar(v) => v,
            AxisValue::Split(x, _) => x,
        }
    }

    /// The y side of the value. Scalars return themselves.
    pub fn y(&self) -> f64 {
        match *self {
            AxisValue::Scalar(v) => v,
            AxisValue::Split(_, y) => y,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, AxisValue::Split(..))
    }

    /// True when the value (or both sides of a split value) is within epsilon of zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            AxisValue::Scalar(v) => is_near_zero(v),
            AxisValue::Split(x, y) => is_near_zero(x) && is_near_zero(y),
        }
    }

    /// True when the value is exactly zero. Split values never are.
    pub fn is_exact_zero(&self) -> bool {
        matches!(*self, AxisValue::Scalar(v) if v == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            AxisValue::Scalar(v) => v.is_finite(),
            AxisValue::Split(x, y) => x.is_finite() && y.is_finite(),
        }
    }

    /// Apply `f` to every side of the value, keeping the variant.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            AxisValue::Scalar(v) => AxisValue::Scalar(f(v)),
            AxisValue::Split(x, y) => AxisValue::Split(f(x), f(y)),
        }
    }

    /// Equality within epsilon. A scalar equals a split value when both sides match it.
    pub fn approx_eq(&self, other: &AxisValue) -> bool {
        let close = |a: f64, b: f64| is_near_zero(a - b) || a == b;
        close(self.x(), other.x()) && close(self.y(), other.y())
    }

    /// Total ordering used for sorting locations: scalars before split values,
    /// then numerically, side by side.
    pub fn sort_cmp(&self, other: &AxisValue) -> Ordering {
        match (self, other) {
            (AxisValue::Scalar(a), AxisValue::Scalar(b)) => a.total_cmp(b),
            (AxisValue::Scalar(_), AxisValue::Split(..)) => Ordering::Less,
            (AxisValue::Split(..), AxisValue::Scalar(_)) => Ordering::Greater,
            (AxisValue::Split(ax, ay), AxisValue::Split(bx, by)) => {
                ax.total_cmp(bx).then_with(|| ay.total_cmp(by))
            }
        }
    }

    pub(crate) fn key(&self) -> KeyValue {
        match *self {
            AxisValue::Scalar(v) => KeyValue::Scalar(OrderedFloat(v)),
            AxisValue::Split(x, y) => KeyValue::Split(OrderedFloat(x), OrderedFloat(y)),
        }
    }
}

impl Default for AxisValue {
    fn default() -> Self {
        AxisValue::Scalar(0.0)
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Scalar(value)
    }
}

impl From<i32> for AxisValue {
    fn from(value: i32) -> Self {
        AxisValue::Scalar(value as f64)
    }
}

impl From<(f64, f64)> for AxisValue {
    fn from((x, y): (f64, f64)) -> Self {
        AxisValue::Split(x, y)
    }
}

impl PartialEq for AxisValue {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

/// Hashable, totally ordered form of an [`AxisValue`], used inside location keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Scalar(OrderedFloat<f64>),
    Split(OrderedFloat<f64>, OrderedFloat<f64>),
}

impl From<KeyValue> for AxisValue {
    fn from(value: KeyValue) -> Self {
        match value {
            KeyValue::Scalar(v) => AxisValue::Scalar(v.into_inner()),
            KeyValue::Split(x, y) => AxisValue::Split(x.into_inner(), y.into_inner()),
        }
    }
}
