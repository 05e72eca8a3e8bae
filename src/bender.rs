//! Per-axis warping of locations.
//!
//! A [`Bender`] remaps coordinates axis by axis before they reach a mutator,
//! either through a piecewise-linear map of `(input, output)` points or an
//! arbitrary function. Point maps are themselves single-axis mutators.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MutatorError, Result};
use crate::interpolation::{build_mutator, Mutator};
use crate::location::{AxisValue, Location};

/// Synthetic axis used inside the single-axis warp mutators.
const WARP_AXIS: &str = "w";

type WarpFn = dyn Fn(f64) -> anyhow::Result<f64> + Send + Sync;

/// A named warp function.
///
/// The name identifies the function in error messages.
#[derive(Clone)]
pub struct WarpFunction {
    name: String,
    func: Arc<WarpFn>,
}

impl WarpFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(f64) -> anyhow::Result<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, value: f64) -> anyhow::Result<f64> {
        (self.func)(value)
    }
}

impl fmt::Debug for WarpFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarpFunction").field("name", &self.name).finish()
    }
}

/// How one axis is remapped.
#[derive(Debug, Clone, Default)]
pub enum AxisMap {
    /// Coordinates pass through unchanged.
    #[default]
    Identity,
    /// Piecewise-linear map through `(input, output)` points.
    Points(Vec<(f64, f64)>),
    /// Arbitrary function.
    Function(WarpFunction),
}

/// A design space axis.
#[derive(Debug, Clone)]
pub struct Axis {
    pub name: String,
    pub tag: Option<String>,
    pub minimum: f64,
    pub maximum: f64,
    pub default: f64,
    pub map: AxisMap,
}

impl Axis {
    pub fn new(name: impl Into<String>, minimum: f64, maximum: f64, default: f64) -> Self {
        Self {
            name: name.into(),
            tag: None,
            minimum,
            maximum,
            default,
            map: AxisMap::Identity,
        }
    }

    pub fn with_map(mut self, map: AxisMap) -> Self {
        self.map = map;
        self
    }
}

#[derive(Debug, Clone)]
enum Warp {
    Map(Mutator<f64>),
    Function(WarpFunction),
}

/// Warps locations axis by axis.
#[derive(Debug, Clone, Default)]
pub struct Bender {
    warps: BTreeMap<String, Warp>,
}

impl Bender {
    /// Build warps for every axis with a map.
    ///
    /// Point maps are extended with `(minimum, minimum)` and
    /// `(maximum, maximum)` when no point starts at those values.
    pub fn new(axes: &BTreeMap<String, Axis>) -> Result<Self> {
        let mut warps = BTreeMap::new();
        for (name, axis) in axes {
            match &axis.map {
                AxisMap::Identity => {}
                AxisMap::Points(points) if points.is_empty() => {}
                AxisMap::Points(points) => {
                    let mutator = Self::map_mutator(points, axis.minimum, axis.maximum)?;
                    warps.insert(name.clone(), Warp::Map(mutator));
                }
                AxisMap::Function(func) => {
                    warps.insert(name.clone(), Warp::Function(func.clone()));
                }
            }
        }
        debug!(axes = axes.len(), warped = warps.len(), "Created bender");
        Ok(Self { warps })
    }

    fn map_mutator(points: &[(f64, f64)], minimum: f64, maximum: f64) -> Result<Mutator<f64>> {
        let mut points = points.to_vec();
        if !points.iter().any(|&(a, _)| a == minimum) {
            points.insert(0, (minimum, minimum));
        }
        if !points.iter().any(|&(a, _)| a == maximum) {
            points.push((maximum, maximum));
        }
        let items: Vec<(Location, f64)> = points
            .into_iter()
            .map(|(x, y)| (Location::new().with(WARP_AXIS, x), y))
            .collect();
        let (_, mutator) = build_mutator(&items, None, None)?;
        Ok(mutator)
    }

    /// Names of the axes that are actually warped.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.warps.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.warps.is_empty()
    }

    /// Warp the coordinates of `location`.
    ///
    /// Only axes present in `location` are touched. Split coordinates are
    /// warped side by side.
    pub fn apply(&self, location: &Location) -> Result<Location> {
        let mut new = location.clone();
        for (dim, warp) in &self.warps {
            let Some(value) = location.get(dim) else {
                continue;
            };
            let bend = |v: f64| -> Result<f64> {
                match warp {
                    Warp::Map(m) => m.make_instance(&Location::new().with(WARP_AXIS, v), false),
                    Warp::Function(func) => {
                        func.call(v).map_err(|source| MutatorError::WarpFailed {
                            axis: dim.clone(),
                            warp: func.name().to_string(),
                            location: location.as_string(),
                            source,
                        })
                    }
                }
            };
            let warped = match *value {
                AxisValue::Scalar(v) => AxisValue::Scalar(bend(v)?),
                AxisValue::Split(x, y) => AxisValue::Split(bend(x)?, bend(y)?),
            };
            new.insert(dim.clone(), warped);
        }
        Ok(new)
    }
}
