//! Piecewise-linear interpolation over n-dimensional design spaces.
//!
//! A [`Mutator`] stores a neutral value plus deltas at bias-relative
//! locations and computes instances anywhere in the space: linearly along
//! each axis, with off-axis deltas acting as corrections for the corners
//! they sit in. [`build_mutator`] assembles one from a list of masters.

pub mod builder;
pub mod factors;
pub mod limits;
pub mod mutator;
pub mod values;

use std::ops::{Add, Sub};

pub use builder::build_mutator;
pub use limits::{get_limits, Limit, Limits};
pub use mutator::{Delta, DeltaMode, Factor, Mutator, MutatorBuilder};
pub use values::{Coordinates, Point};

/// The capabilities a value needs to be interpolated.
///
/// Deltas are combined as `factor * delta` sums, so addition, subtraction and
/// scaling are all the engine ever does with a value. `scale(0.0)` must give
/// a meaningful zero.
pub trait MathObject: Clone + Add<Output = Self> + Sub<Output = Self> {
    /// Multiply by a scalar.
    fn scale(&self, factor: f64) -> Self;

    /// Multiply the horizontal parts by `x` and the vertical parts by `y`.
    ///
    /// Used to recombine the two sides of a split query.
    fn scale_xy(&self, x: f64, y: f64) -> Self;

    /// Why `self` can not be combined with `other`, if it can't.
    ///
    /// Values of a fixed shape never mismatch.
    fn mismatch(&self, _other: &Self) -> Option<String> {
        None
    }
}
