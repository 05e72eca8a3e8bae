//! The interpolation engine.
//!
//! A mutator is assembled with a [`MutatorBuilder`] and then frozen into a
//! [`Mutator`] that only answers queries. Deltas are stored relative to the
//! bias, keyed by their canonical location so duplicates collapse.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::factors::{off_axis_factor, on_axis_factor};
use super::limits::get_limits;
use super::MathObject;
use crate::bender::Bender;
use crate::error::Result;
use crate::location::{is_near_zero, AxisPlacement, Location, LocationKey};

/// Name of the zero delta recorded at the origin for the neutral.
pub const ORIGIN_DELTA: &str = "origin";

/// A value stored at a bias-relative location.
#[derive(Debug, Clone)]
pub struct Delta<V> {
    pub location: Location,
    pub value: V,
    pub name: Option<String>,
}

/// How [`MutatorBuilder::add_delta`] stores a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// Store the value as given.
    Absolute,
    /// Store the difference between the value and what the mutator already
    /// computes at that location. With `axis_only` only on-axis deltas are
    /// taken into account for that computation.
    Punch { axis_only: bool },
}

/// One term of an instance: the weight, the delta value and its name.
pub type Factor<'a, V> = (f64, &'a V, Option<&'a str>);

/// Deltas plus the per-axis index of on-axis coordinates.
#[derive(Debug, Clone)]
struct DeltaTable<V> {
    neutral: V,
    deltas: BTreeMap<LocationKey, Delta<V>>,
    axis_points: BTreeMap<String, Vec<f64>>,
}

impl<V: MathObject> DeltaTable<V> {
    fn new(neutral: V) -> Self {
        let mut table = Self {
            neutral: neutral.clone(),
            deltas: BTreeMap::new(),
            axis_points: BTreeMap::new(),
        };
        let zero = neutral.clone() - neutral;
        table.insert(Location::new(), zero, Some(ORIGIN_DELTA.to_string()));
        table
    }

    fn insert(&mut self, location: Location, value: V, name: Option<String>) {
        if let AxisPlacement::OnAxis(axis) = location.is_on_axis() {
            let points = self.axis_points.entry(axis.clone()).or_insert_with(|| vec![0.0]);
            let coordinate = location.coordinate(&axis);
            if !points.contains(&coordinate) {
                points.push(coordinate);
                points.sort_by(f64::total_cmp);
            }
        }
        self.deltas.insert(
            location.key(),
            Delta {
                location,
                value,
                name,
            },
        );
    }

    fn axis_names(&self) -> BTreeSet<String> {
        self.deltas
            .keys()
            .flat_map(|key| key.axes().map(str::to_string))
            .collect()
    }

    fn factor(&self, query: &Location, delta: &Location, limits: &super::Limits, axis_only: bool) -> f64 {
        match delta.is_on_axis() {
            AxisPlacement::Origin => 1.0,
            AxisPlacement::OnAxis(axis) => {
                let index = self.axis_points.get(&axis).map(Vec::as_slice).unwrap_or(&[]);
                on_axis_factor(query.coordinate(&axis), delta.coordinate(&axis), index)
            }
            AxisPlacement::OffAxis if axis_only => 0.0,
            AxisPlacement::OffAxis => off_axis_factor(query, delta, limits),
        }
    }

    fn get_factors(&self, location: &Location, axis_only: bool, all_factors: bool) -> Vec<Factor<'_, V>> {
        let names = self.axis_names();
        let mut query = location.clone();
        query.expand(&names);
        let locations: Vec<Location> = self.deltas.values().map(|d| d.location.clone()).collect();
        let limits = get_limits(&locations, &query);

        let mut factors = Vec::new();
        for delta in self.deltas.values() {
            let mut expanded = delta.location.clone();
            expanded.expand(&names);
            let factor = self.factor(&query, &expanded, &limits, axis_only);
            if !is_near_zero(factor) || all_factors {
                factors.push((factor, &delta.value, delta.name.as_deref()));
            }
        }
        factors.sort_by(|a, b| b.0.total_cmp(&a.0));
        factors
    }

    fn get_instance(&self, location: &Location, axis_only: bool) -> V {
        if location.is_ambivalent() {
            let (x, y) = location.split();
            return self.get_instance(&x, axis_only).scale_xy(1.0, 0.0)
                + self.get_instance(&y, axis_only).scale_xy(0.0, 1.0);
        }
        let total = self
            .get_factors(location, axis_only, false)
            .into_iter()
            .map(|(factor, value, _)| value.scale(factor))
            .reduce(|total, term| total + term);
        total.unwrap_or_else(|| self.neutral.scale(0.0))
    }
}

/// Assembles a [`Mutator`]. Deltas can only be added here.
#[derive(Debug, Clone)]
pub struct MutatorBuilder<V> {
    bias: Location,
    bender: Option<Bender>,
    table: DeltaTable<V>,
}

impl<V: MathObject> MutatorBuilder<V> {
    /// Start with `neutral` as the value at the origin.
    pub fn new(neutral: V) -> Self {
        Self {
            bias: Location::new(),
            bender: None,
            table: DeltaTable::new(neutral),
        }
    }

    pub fn with_bias(mut self, bias: Location) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_bender(mut self, bender: Option<Bender>) -> Self {
        self.bender = bender;
        self
    }

    /// Replace the neutral. This also resets the zero delta at the origin.
    pub fn set_neutral(&mut self, neutral: V, name: &str) {
        let zero = neutral.clone() - neutral.clone();
        self.table.neutral = neutral;
        self.table.insert(Location::new(), zero, Some(name.to_string()));
    }

    /// Store a delta at a bias-relative location.
    ///
    /// Punched deltas must be added after the deltas they correct: the
    /// stored residual depends on what is already in the mutator.
    pub fn add_delta(&mut self, location: Location, value: V, name: Option<&str>, mode: DeltaMode) {
        let value = match mode {
            DeltaMode::Absolute => value,
            DeltaMode::Punch { axis_only } => {
                let current = self.table.get_instance(&location, axis_only);
                value - current
            }
        };
        trace!(location = %location, name = ?name, ?mode, "Adding delta");
        self.table.insert(location, value, name.map(str::to_string));
    }

    /// The delta sum at a bias-relative location, as built so far.
    pub fn get_instance(&self, location: &Location, axis_only: bool) -> V {
        self.table.get_instance(location, axis_only)
    }

    pub fn build(self) -> Mutator<V> {
        Mutator {
            bias: self.bias,
            bender: self.bender,
            table: self.table,
        }
    }
}

/// A frozen interpolation system.
///
/// Queries never mutate the mutator, so it can be shared between threads
/// when the value type allows it.
#[derive(Debug, Clone)]
pub struct Mutator<V> {
    bias: Location,
    bender: Option<Bender>,
    table: DeltaTable<V>,
}

impl<V: MathObject> Mutator<V> {
    pub fn bias(&self) -> &Location {
        &self.bias
    }

    pub fn neutral(&self) -> &V {
        &self.table.neutral
    }

    pub fn bender(&self) -> Option<&Bender> {
        self.bender.as_ref()
    }

    /// Every axis name used by any delta.
    pub fn get_axis_names(&self) -> BTreeSet<String> {
        self.table.axis_names()
    }

    /// The bias-relative locations of all deltas, the origin included.
    pub fn collect_locations(&self) -> Vec<Location> {
        self.table.deltas.values().map(|d| d.location.clone()).collect()
    }

    /// Deltas in canonical location order.
    pub fn deltas(&self) -> impl Iterator<Item = &Delta<V>> {
        self.table.deltas.values()
    }

    pub fn len(&self) -> usize {
        self.table.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.deltas.is_empty()
    }

    /// The weighted terms for a bias-relative location, largest weight first.
    ///
    /// Terms with a near-zero weight are left out unless `all_factors` is set.
    pub fn get_factors(&self, location: &Location, axis_only: bool, all_factors: bool) -> Vec<Factor<'_, V>> {
        self.table.get_factors(location, axis_only, all_factors)
    }

    /// The delta sum at a bias-relative location, without the neutral.
    pub fn get_instance(&self, location: &Location, axis_only: bool) -> V {
        self.table.get_instance(location, axis_only)
    }

    /// The value at `location`, given in the same space as the masters.
    ///
    /// With `bend` the location is warped by the bender first, if there is
    /// one. Split locations are resolved per side and recombined.
    pub fn make_instance(&self, location: &Location, bend: bool) -> Result<V> {
        let location = match (&self.bender, bend) {
            (Some(bender), true) => bender.apply(location)?,
            _ => location.clone(),
        };
        let delta = if location.is_ambivalent() {
            let (x, y) = location.split();
            self.get_instance(&(&x - &self.bias), false).scale_xy(1.0, 0.0)
                + self.get_instance(&(&y - &self.bias), false).scale_xy(0.0, 1.0)
        } else {
            self.get_instance(&(&location - &self.bias), false)
        };
        Ok(delta + self.table.neutral.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Point;
    use crate::location;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn single_axis() -> Mutator<f64> {
        let mut m = MutatorBuilder::new(0.0);
        m.add_delta(location!(pop = 1), 100.0, Some("test"), DeltaMode::Absolute);
        m.build()
    }

    fn two_axes(with_corner: bool) -> Mutator<f64> {
        let mut m = MutatorBuilder::new(0.0);
        m.add_delta(location!(pop = 1), 100.0, Some("test1"), DeltaMode::Absolute);
        m.add_delta(location!(snap = 1), -100.0, Some("test2"), DeltaMode::Absolute);
        if with_corner {
            m.add_delta(location!(pop = 1, snap = 1), 50.0, Some("test3"), DeltaMode::Punch { axis_only: true });
        }
        m.build()
    }

    #[test]
    fn test_single_axis() {
        let m = single_axis();
        for (n, expected) in [
            (1.0, 100.0),
            (0.0, 0.0),
            (0.5, 50.0),
            (0.99, 99.0),
            (-1.0, -100.0),
            (-2.0, -200.0),
            (-1.5, -150.0),
            (2.0, 200.0),
        ] {
            let got = m.get_instance(&location!(pop = n), false);
            assert!(approx(got, expected), "pop={}: {} != {}", n, got, expected);
        }
    }

    #[test]
    fn test_two_axes_on_axis() {
        let m = two_axes(false);
        for (pop, snap, expected) in [
            (1.0, 1.0, 0.0),
            (1.0, 0.0, 100.0),
            (0.0, 1.0, -100.0),
            (2.0, 0.0, 200.0),
            (0.0, 2.0, -200.0),
        ] {
            let got = m.get_instance(&location!(pop = pop, snap = snap), false);
            assert!(approx(got, expected), "({}, {}): {} != {}", pop, snap, got, expected);
        }
    }

    #[test]
    fn test_two_axes_off_axis() {
        let m = two_axes(true);
        for (pop, snap, expected) in [
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 50.0),
            (2.0, 2.0, 200.0),
            (1.0, 0.0, 100.0),
            (0.0, 1.0, -100.0),
            (2.0, 0.0, 200.0),
            (0.0, 2.0, -200.0),
        ] {
            let got = m.get_instance(&location!(pop = pop, snap = snap), false);
            assert!(approx(got, expected), "({}, {}): {} != {}", pop, snap, got, expected);
        }
    }

    #[test]
    fn test_small_values_are_not_dropped() {
        let mut b = MutatorBuilder::new(0.0);
        b.add_delta(location!(pop = 1), 1e-15, None, DeltaMode::Absolute);
        b.add_delta(location!(snap = 1), -1e-15, None, DeltaMode::Absolute);
        b.add_delta(location!(pop = 1, snap = 1), 0.5e-15, None, DeltaMode::Punch { axis_only: true });
        let m = b.build();
        let at = |pop: f64, snap: f64| m.get_instance(&location!(pop = pop, snap = snap), false);
        assert!((at(1.0, 1.0) - 5e-16).abs() < 1e-25);
        assert!((at(2.0, 2.0) - 2e-15).abs() < 1e-25);
        assert!((at(1.0, 0.0) - 1e-15).abs() < 1e-25);
        assert!((at(0.0, 2.0) + 2e-15).abs() < 1e-25);
    }

    #[test]
    fn test_punch_stores_residual() {
        let m = two_axes(true);
        let corner = m
            .deltas()
            .find(|d| d.location == location!(pop = 1, snap = 1))
            .map(|d| d.value);
        // the on-axis deltas cancel out at (1, 1)
        assert_eq!(corner, Some(50.0));
    }

    #[test]
    fn test_introspection() {
        let m = two_axes(true);
        assert_eq!(
            m.get_axis_names().into_iter().collect::<Vec<_>>(),
            vec!["pop".to_string(), "snap".to_string()]
        );
        assert_eq!(m.len(), 4);
        assert_eq!(m.collect_locations()[0], location!());
        let names: Vec<Option<String>> = m.deltas().map(|d| d.name.clone()).collect();
        assert_eq!(names[0].as_deref(), Some(ORIGIN_DELTA));

        let factors = m.get_factors(&location!(pop = 0.5), false, false);
        assert!(factors.windows(2).all(|w| w[0].0 >= w[1].0));
        assert!(factors.iter().any(|(f, _, name)| approx(*f, 0.5) && *name == Some("test1")));

        let all = m.get_factors(&location!(pop = 0.5), false, true);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_duplicate_locations_collapse() {
        let mut b = MutatorBuilder::new(0.0);
        b.add_delta(location!(pop = 1), 10.0, None, DeltaMode::Absolute);
        b.add_delta(location!(pop = 1), 20.0, None, DeltaMode::Absolute);
        let m = b.build();
        assert_eq!(m.len(), 2);
        assert!(approx(m.get_instance(&location!(pop = 1), false), 20.0));
    }

    #[test]
    fn test_empty_mutator_returns_zero() {
        let m = MutatorBuilder::new(Point::new(3.0, 4.0)).build();
        assert_eq!(m.get_instance(&location!(pop = 1), false), Point::new(0.0, 0.0));
        assert_eq!(m.make_instance(&location!(pop = 1), true).unwrap(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_make_instance_with_bias_and_neutral() {
        let mut b = MutatorBuilder::new(10.0).with_bias(location!(pop = 100));
        b.add_delta(location!(pop = 100), 100.0, None, DeltaMode::Absolute);
        let m = b.build();
        assert!(approx(m.make_instance(&location!(pop = 100), false).unwrap(), 10.0));
        assert!(approx(m.make_instance(&location!(pop = 150), false).unwrap(), 60.0));
        assert!(approx(m.make_instance(&location!(pop = 200), false).unwrap(), 110.0));
    }

    #[test]
    fn test_split_query() {
        let mut b = MutatorBuilder::new(Point::new(0.0, 0.0));
        b.add_delta(location!(pop = 1), Point::new(100.0, 100.0), None, DeltaMode::Absolute);
        let m = b.build();
        let p = m.make_instance(&location!(pop = (0.25, 0.75)), false).unwrap();
        assert!(approx(p.x, 25.0));
        assert!(approx(p.y, 75.0));
        let p = m.get_instance(&location!(pop = (0.25, 0.75)), false);
        assert!(approx(p.x, 25.0));
        assert!(approx(p.y, 75.0));
    }

    #[test]
    fn test_set_neutral_resets_origin() {
        let mut b = MutatorBuilder::new(1.0);
        b.set_neutral(5.0, "base");
        b.add_delta(location!(pop = 1), 5.0, None, DeltaMode::Absolute);
        let m = b.build();
        assert_eq!(m.len(), 2);
        assert_eq!(*m.neutral(), 5.0);
        assert_eq!(m.deltas().next().and_then(|d| d.name.as_deref()), Some("base"));
        assert!(approx(m.make_instance(&location!(pop = 1), false).unwrap(), 10.0));
    }

    #[test]
    fn test_mutator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Mutator<f64>>();
        assert_send_sync::<Mutator<Point>>();
    }
}
