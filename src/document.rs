//! Design space documents.
//!
//! A document lists axes, masters with flat numeric values and the instances
//! to compute. This module loads and checks one, builds the mutator and
//! evaluates the instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::bender::{Axis, Bender};
use crate::config::AxisConfig;
use crate::error::{MutatorError, Result};
use crate::interpolation::{build_mutator, Coordinates, Mutator};
use crate::location::Location;

/// A known sample of the design space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    #[serde(default)]
    pub name: Option<String>,
    pub location: Location,
    pub value: Coordinates,
}

/// A location to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub name: Option<String>,
    pub location: Location,
}

/// A computed instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceResult {
    pub name: Option<String>,
    pub location: Location,
    pub value: Coordinates,
}

/// The result of evaluating a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub bias: Location,
    pub instances: Vec<InstanceResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub axes: BTreeMap<String, AxisConfig>,

    pub masters: Vec<Master>,

    #[serde(default)]
    pub instances: Vec<Instance>,

    /// Explicit bias, in the same space as the master locations.
    #[serde(default)]
    pub bias: Option<Location>,
}

fn invalid(message: String) -> MutatorError {
    MutatorError::InvalidDocument { message }
}

/// Load a document from a JSON file and validate it.
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(MutatorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let document: Document = serde_json::from_str(&content)?;
    info!("Opened document: {}", path.display());
    debug!(
        axes = document.axes.len(),
        masters = document.masters.len(),
        instances = document.instances.len(),
        "Document contents"
    );

    document.validate()?;
    Ok(document)
}

impl Document {
    /// Check the document for consistency.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.masters.first() else {
            return Err(invalid("No masters found in document".to_string()));
        };

        for (name, axis) in &self.axes {
            axis.validate(name)?;
        }

        let expected = first.value.len();
        for (i, master) in self.masters.iter().enumerate() {
            let label = master.name.clone().unwrap_or_else(|| format!("#{}", i));
            master.location.validate()?;
            if master.location.is_ambivalent() {
                return Err(MutatorError::AmbivalentMaster {
                    location: master.location.as_string(),
                });
            }
            if master.value.len() != expected {
                return Err(invalid(format!(
                    "Master {} has {} values, expected {}",
                    label,
                    master.value.len(),
                    expected
                )));
            }
            if master.value.as_slice().iter().any(|v| !v.is_finite()) {
                return Err(invalid(format!("Master {} has a value that is not a finite number", label)));
            }
        }

        for instance in &self.instances {
            instance.location.validate()?;
        }
        if let Some(bias) = &self.bias {
            bias.validate()?;
        }
        Ok(())
    }

    /// The axes names, sorted.
    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.keys().map(String::as_str).collect()
    }

    /// A bender for the document axes, or `None` when no axes are declared.
    pub fn bender(&self) -> Result<Option<Bender>> {
        if self.axes.is_empty() {
            return Ok(None);
        }
        let axes: BTreeMap<String, Axis> = self
            .axes
            .iter()
            .map(|(name, axis)| (name.clone(), axis.to_axis(name)))
            .collect();
        Bender::new(&axes).map(Some)
    }

    /// Build the mutator for the masters.
    pub fn build(&self) -> Result<(Location, Mutator<Coordinates>)> {
        let items: Vec<(Location, Coordinates)> = self
            .masters
            .iter()
            .map(|m| (m.location.clone(), m.value.clone()))
            .collect();
        build_mutator(&items, self.bender()?, self.bias.as_ref())
    }

    /// Compute every instance. With `bend` instance locations go through
    /// the axis maps first, like the master locations do.
    pub fn evaluate(&self, bend: bool) -> Result<Evaluation> {
        let (bias, mutator) = self.build()?;
        let instances = self
            .instances
            .iter()
            .map(|instance| {
                Ok(InstanceResult {
                    name: instance.name.clone(),
                    location: instance.location.clone(),
                    value: mutator.make_instance(&instance.location, bend)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Evaluation { bias, instances })
    }
}
