//! Configuration management for mutator-math.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)
//!
//! It also holds [`AxisConfig`], the serialized form of a design space axis.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bender::{Axis, AxisMap};
use crate::error::{MutatorError, Result};

/// Command-line arguments for mutator-math
#[derive(Parser, Debug)]
#[command(name = "mutator-math")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the design space document (JSON)
    pub document: PathBuf,

    /// Path to JSON configuration file
    #[arg(short, long, env = "MUTATOR_MATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MUTATOR_MATH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Treat instance locations as internal coordinates, skipping axis maps
    #[arg(long, env = "MUTATOR_MATH_NO_BEND")]
    pub no_bend: bool,

    /// Pretty-print the JSON output
    #[arg(long, env = "MUTATOR_MATH_PRETTY")]
    pub pretty: bool,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Apply axis maps to instance locations
    #[serde(default = "default_bend")]
    pub bend: bool,

    /// Pretty-print output
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, PathBuf)> {
        Self::from_args(Args::parse())
    }

    /// Layer a JSON config file (if any) and the arguments over the defaults.
    pub fn from_args(args: Args) -> Result<(Self, PathBuf)> {
        let mut config = Config::default();

        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if args.no_bend {
            config.bend = false;
        }
        if args.pretty {
            config.pretty = true;
        }

        Ok((config, args.document))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.log_level = other.log_level;
        self.bend = other.bend;
        self.pretty = other.pretty;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(MutatorError::Config {
                message: format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                ),
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            bend: default_bend(),
            pretty: false,
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_bend() -> bool {
    true
}

/// A design space axis as written in documents.
///
/// `map` lists `[input, output]` pairs; leave it out for an unwarped axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tag: Option<String>,

    pub minimum: f64,

    pub maximum: f64,

    #[serde(default)]
    pub default: f64,

    #[serde(default)]
    pub map: Option<Vec<(f64, f64)>>,
}

impl AxisConfig {
    pub fn validate(&self, axis_name: &str) -> Result<()> {
        let values = [self.minimum, self.maximum, self.default];
        let map_values = self.map.iter().flatten().flat_map(|&(a, b)| [a, b]);
        if values.into_iter().chain(map_values).any(|v| !v.is_finite()) {
            return Err(MutatorError::Config {
                message: format!("Axis {} has a value that is not a finite number", axis_name),
            });
        }
        if self.minimum > self.maximum {
            return Err(MutatorError::Config {
                message: format!(
                    "Axis {} has minimum {} above maximum {}",
                    axis_name, self.minimum, self.maximum
                ),
            });
        }
        Ok(())
    }

    /// The engine-side axis. Without a map the axis is not warped.
    pub fn to_axis(&self, axis_name: &str) -> Axis {
        let map = match &self.map {
            Some(points) => AxisMap::Points(points.clone()),
            None => AxisMap::Identity,
        };
        let mut axis = Axis::new(
            self.name.clone().unwrap_or_else(|| axis_name.to_string()),
            self.minimum,
            self.maximum,
            self.default,
        )
        .with_map(map);
        axis.tag = self.tag.clone();
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(document: &str) -> Args {
        Args {
            document: PathBuf::from(document),
            config: None,
            log_level: None,
            no_bend: false,
            pretty: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert!(config.bend);
        assert!(!config.pretty);
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.bend = false;
        config2.log_level = "debug".to_string();

        config1.merge(config2);

        assert!(!config1.bend);
        assert_eq!(config1.log_level, "debug");
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "warn", "pretty": true}}"#).unwrap();

        let mut a = args("design.json");
        a.config = Some(file.path().to_path_buf());
        a.no_bend = true;
        let (config, document) = Config::from_args(a).unwrap();
        assert_eq!(document, PathBuf::from("design.json"));
        assert_eq!(config.log_level, "warn");
        assert!(config.pretty);
        assert!(!config.bend);

        let mut a = args("design.json");
        a.config = Some(file.path().to_path_buf());
        a.log_level = Some("trace".to_string());
        let (config, _) = Config::from_args(a).unwrap();
        assert_eq!(config.log_level, "trace");
        assert!(config.bend);
    }

    #[test]
    fn test_missing_config_file() {
        let mut a = args("design.json");
        a.config = Some(PathBuf::from("/nonexistent/mutator-math.json"));
        assert!(matches!(Config::from_args(a), Err(MutatorError::Io(_))));
    }

    #[test]
    fn test_axis_config() {
        let json = r#"{"tag": "wght", "minimum": 0, "maximum": 1000, "map": [[0, 0], [500, 200]]}"#;
        let config: AxisConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate("weight").is_ok());
        let axis = config.to_axis("weight");
        assert_eq!(axis.name, "weight");
        assert_eq!(axis.tag.as_deref(), Some("wght"));
        assert_eq!(axis.default, 0.0);
        assert!(matches!(axis.map, AxisMap::Points(ref p) if p == &vec![(0.0, 0.0), (500.0, 200.0)]));

        let plain: AxisConfig = serde_json::from_str(r#"{"minimum": 0, "maximum": 1}"#).unwrap();
        assert!(matches!(plain.to_axis("x").map, AxisMap::Identity));
    }

    #[test]
    fn test_axis_config_validation() {
        let reversed: AxisConfig = serde_json::from_str(r#"{"minimum": 10, "maximum": 1}"#).unwrap();
        assert!(reversed.validate("weight").is_err());
    }
}
