//! Building a mutator from masters.

use tracing::debug;

use super::mutator::{DeltaMode, Mutator, MutatorBuilder};
use super::MathObject;
use crate::bender::Bender;
use crate::bias::bias_from_locations;
use crate::error::{MutatorError, Result};
use crate::location::Location;

fn reject_split(location: &Location) -> Result<()> {
    if location.is_ambivalent() {
        return Err(MutatorError::AmbivalentMaster {
            location: location.as_string(),
        });
    }
    Ok(())
}

/// Build a mutator from `(location, value)` masters.
///
/// Master locations are warped by `bender` when one is given. The bias is
/// `bias` (warped the same way) or, when absent or empty, derived from the
/// masters. The master at the bias becomes the neutral; on-axis masters are
/// added first and off-axis masters are punched against them.
///
/// Returns the bias in warped coordinates together with the mutator.
pub fn build_mutator<V: MathObject>(
    items: &[(Location, V)],
    bender: Option<Bender>,
    bias: Option<&Location>,
) -> Result<(Location, Mutator<V>)> {
    let mut items: Vec<&(Location, V)> = items.iter().collect();
    items.sort_by(|a, b| a.0.sort_cmp(&b.0));

    let bend = |location: &Location| -> Result<Location> {
        match &bender {
            Some(bender) => bender.apply(location),
            None => Ok(location.clone()),
        }
    };

    let mut bent = Vec::with_capacity(items.len());
    for (location, value) in &items {
        reject_split(location)?;
        bent.push((bend(location)?, value));
    }

    let bias = match bias.filter(|b| !b.is_empty()) {
        Some(bias) => {
            reject_split(bias)?;
            bend(bias)?
        }
        None => {
            let locations: Vec<Location> = bent.iter().map(|(l, _)| l.clone()).collect();
            bias_from_locations(&locations)
        }
    };
    debug!(bias = %bias, masters = items.len(), "Resolved bias");

    let Some(neutral) = bent
        .iter()
        .find(|(l, _)| (l - &bias).is_origin())
        .map(|(_, v)| (*v).clone())
    else {
        return Err(MutatorError::NoNeutral {
            bias: bias.as_string(),
        });
    };

    for (location, value) in &bent {
        if let Some(reason) = value.mismatch(&neutral) {
            return Err(MutatorError::IncompatibleMaster {
                location: location.as_string(),
                reason,
            });
        }
    }

    let mut on_axis = Vec::new();
    let mut off_axis = Vec::new();
    for (location, value) in &bent {
        let relative = location - &bias;
        if relative.is_origin() {
            continue;
        }
        let delta = (*value).clone() - neutral.clone();
        if relative.is_on_axis().is_off_axis() {
            off_axis.push((relative, delta));
        } else {
            on_axis.push((relative, delta));
        }
    }
    debug!(on_axis = on_axis.len(), off_axis = off_axis.len(), "Adding deltas");

    let mut builder = MutatorBuilder::new(neutral)
        .with_bias(bias.clone())
        .with_bender(bender);
    for (location, delta) in on_axis {
        builder.add_delta(location, delta, None, DeltaMode::Absolute);
    }
    for (location, delta) in off_axis {
        builder.add_delta(location, delta, None, DeltaMode::Punch { axis_only: true });
    }
    Ok((bias, builder.build()))
}
