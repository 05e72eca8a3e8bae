//! Arithmetic on locations.

use std::ops::{Add, Mul, Sub};

use super::{AxisValue, Location};
use crate::error::{MutatorError, Result};

fn combine(a: AxisValue, b: AxisValue, op: impl Fn(f64, f64) -> f64) -> AxisValue {
    AxisValue::pair(op(a.x(), b.x()), op(a.y(), b.y()))
}

impl Add for &Location {
    type Output = Location;

    fn add(self, other: &Location) -> Location {
        let mut new = self.clone();
        for (key, &value) in &other.axes {
            let sum = match self.axes.get(key) {
                Some(&mine) => combine(mine, value, |a, b| a + b),
                None => value,
            };
            new.axes.insert(key.clone(), sum);
        }
        new
    }
}

impl Sub for &Location {
    type Output = Location;

    fn sub(self, other: &Location) -> Location {
        let mut new = self.clone();
        for (key, &value) in &other.axes {
            let difference = match self.axes.get(key) {
                Some(&mine) => combine(mine, value, |a, b| a - b),
                None => value.map(|v| -v),
            };
            new.axes.insert(key.clone(), difference);
        }
        new
    }
}

impl Mul<f64> for &Location {
    type Output = Location;

    fn mul(self, factor: f64) -> Location {
        Location {
            axes: self
                .axes
                .iter()
                .map(|(k, v)| (k.clone(), v.map(|c| c * factor)))
                .collect(),
        }
    }
}

/// Asymmetric scaling: x sides by the first factor, y sides by the second.
impl Mul<(f64, f64)> for &Location {
    type Output = Location;

    fn mul(self, (fx, fy): (f64, f64)) -> Location {
        Location {
            axes: self
                .axes
                .iter()
                .map(|(k, v)| (k.clone(), AxisValue::pair(fx * v.x(), fy * v.y())))
                .collect(),
        }
    }
}

macro_rules! forward_owned {
    ($trait:ident, $method:ident, $rhs:ty) => {
        impl $trait<$rhs> for Location {
            type Output = Location;

            fn $method(self, rhs: $rhs) -> Location {
                (&self).$method(rhs)
            }
        }
    };
}

forward_owned!(Mul, mul, f64);
forward_owned!(Mul, mul, (f64, f64));

impl Add for Location {
    type Output = Location;

    fn add(self, other: Location) -> Location {
        &self + &other
    }
}

impl Sub for Location {
    type Output = Location;

    fn sub(self, other: Location) -> Location {
        &self - &other
    }
}

impl Mul<&Location> for f64 {
    type Output = Location;

    fn mul(self, location: &Location) -> Location {
        location * self
    }
}

impl Mul<Location> for f64 {
    type Output = Location;

    fn mul(self, location: Location) -> Location {
        &location * self
    }
}

impl Location {
    /// Divide every coordinate by `factor`.
    pub fn checked_div(&self, factor: f64) -> Result<Location> {
        if factor == 0.0 {
            return Err(MutatorError::ZeroDivision {
                factor: factor.to_string(),
            });
        }
        Ok(self * (1.0 / factor))
    }

    /// Divide by a pair: the sum of the location scaled by both reciprocals.
    pub fn checked_div_pair(&self, (fx, fy): (f64, f64)) -> Result<Location> {
        if fx == 0.0 || fy == 0.0 {
            return Err(MutatorError::ZeroDivision {
                factor: format!("({}, {})", fx, fy),
            });
        }
        Ok(&(self * (1.0 / fx)) + &(self * (1.0 / fy)))
    }
}
