//! Value types that can be interpolated out of the box.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::MathObject;
use crate::location::Location;

/// Plain numbers. Pair scaling uses the horizontal factor only, the way a
/// horizontal metric such as an advance width or a kerning value behaves.
impl MathObject for f64 {
    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn scale_xy(&self, x: f64, _y: f64) -> Self {
        self * x
    }
}

/// A 2D point whose coordinates scale independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl MathObject for Point {
    fn scale(&self, factor: f64) -> Self {
        Point::new(self.x * factor, self.y * factor)
    }

    fn scale_xy(&self, x: f64, y: f64) -> Self {
        Point::new(self.x * x, self.y * y)
    }
}

/// A flat list of interleaved coordinates: even indices are x, odd indices y.
///
/// This is how outline data travels through design space documents.
///
/// # Panics
///
/// Adding or subtracting values of different lengths panics. Masters are
/// checked with [`MathObject::mismatch`] before a mutator is built from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinates(pub Vec<f64>);

impl Coordinates {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Coordinates {
    fn from(values: Vec<f64>) -> Self {
        Coordinates(values)
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, other: Coordinates) -> Coordinates {
        assert_eq!(self.len(), other.len(), "coordinate lists differ in length");
        Coordinates(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, other: Coordinates) -> Coordinates {
        assert_eq!(self.len(), other.len(), "coordinate lists differ in length");
        Coordinates(self.0.iter().zip(&other.0).map(|(a, b)| a - b).collect())
    }
}

impl MathObject for Coordinates {
    fn scale(&self, factor: f64) -> Self {
        Coordinates(self.0.iter().map(|v| v * factor).collect())
    }

    fn scale_xy(&self, x: f64, y: f64) -> Self {
        Coordinates(
            self.0
                .iter()
                .enumerate()
                .map(|(i, v)| if i % 2 == 0 { v * x } else { v * y })
                .collect(),
        )
    }

    fn mismatch(&self, other: &Self) -> Option<String> {
        (self.len() != other.len())
            .then(|| format!("{} values, expected {}", self.len(), other.len()))
    }
}

/// Locations interpolate too, which is what warping a design space needs.
impl MathObject for Location {
    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn scale_xy(&self, x: f64, y: f64) -> Self {
        self * (x, y)
    }
}
