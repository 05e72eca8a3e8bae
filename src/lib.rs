//! # mutator-math
//!
//! Piecewise-linear interpolation in n-dimensional design spaces.
//!
//! A design space has named axes. Masters are known values at locations in
//! that space; the library computes values anywhere else, interpolating
//! linearly along each axis and extrapolating past the outermost masters.
//!
//! ## Key Features
//!
//! - **Location algebra**: locations add, subtract and scale like vectors, with
//!   missing axes read as zero and split coordinates for anisotropic queries
//! - **Automatic bias**: the origin of the system is picked among the masters
//! - **Axis warping**: per-axis piecewise-linear maps or functions
//! - **Any value type**: anything implementing [`MathObject`] interpolates
//!
//! ## Architecture
//!
//! - [`location`]: coordinates and their arithmetic
//! - [`bias`]: choosing the origin of a master set
//! - [`interpolation`]: the mutator engine and its builder
//! - [`bender`]: axis warps
//! - [`document`]: JSON design space documents used by the CLI

pub mod bender;
pub mod bias;
pub mod config;
pub mod document;
pub mod error;
pub mod interpolation;
pub mod location;
pub mod logging;

pub use bender::{Axis, AxisMap, Bender, WarpFunction};
pub use bias::{bias_from_locations, most_common, sort_locations};
pub use config::{AxisConfig, Config};
pub use error::{MutatorError, Result};
pub use interpolation::{
    build_mutator, get_limits, Coordinates, Delta, DeltaMode, Limit, MathObject, Mutator,
    MutatorBuilder, Point,
};
pub use location::{number_to_string, AxisPlacement, AxisValue, Location, EPSILON};
pub use logging::{init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation};
