//! Configuration loading and typed config structures for the simulator.
//!
//! The engine reads `cyclic-config.yaml` (or a path given on the command
//! line). Every section and field is optional and falls back to the
//! defaults below, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ParameterError;
use crate::observer::SnapshotRecorder;
use crate::params::{RateConstants, RunParams};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Lattice dimensions and initial fill.
    #[serde(default)]
    pub lattice: LatticeConfig,

    /// Per-pair rate constants.
    #[serde(default)]
    pub rates: RatesConfig,

    /// Step budget, seed, and snapshot cadence.
    #[serde(default)]
    pub run: RunConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Validated run parameters described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if any value is out of range.
    pub fn to_params(&self) -> Result<RunParams, ParameterError> {
        RunParams::new(
            self.lattice.size,
            self.lattice.initial_density,
            self.run.total_steps,
            self.rates.constants(),
            self.run.seed,
        )
    }

    /// A recorder spreading `run.snapshots` frames over the run, or `None`
    /// when snapshots are disabled.
    pub fn snapshot_recorder(&self) -> Option<SnapshotRecorder> {
        SnapshotRecorder::spread(self.run.total_steps, self.run.snapshots)
    }
}

/// Lattice configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatticeConfig {
    /// Side length N of the N×N torus.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Probability that a site starts occupied.
    #[serde(default = "default_initial_density")]
    pub initial_density: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            initial_density: default_initial_density(),
        }
    }
}

/// Rate constants, applied per ordered neighbour pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatesConfig {
    /// Competition rate.
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Reproduction rate.
    #[serde(default = "default_mu")]
    pub mu: f64,

    /// Pair-exchange rate.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Hopping rate.
    #[serde(default = "default_hopping", alias = "D")]
    pub hopping: f64,
}

impl RatesConfig {
    /// The rate constants in their core representation.
    pub const fn constants(&self) -> RateConstants {
        RateConstants {
            sigma: self.sigma,
            mu: self.mu,
            epsilon: self.epsilon,
            hopping: self.hopping,
        }
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            sigma: default_sigma(),
            mu: default_mu(),
            epsilon: default_epsilon(),
            hopping: default_hopping(),
        }
    }
}

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Maximum number of events to execute.
    #[serde(default = "default_total_steps")]
    pub total_steps: u64,

    /// Seed for the run generator. A fresh seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Number of lattice snapshots to take over the run. 0 disables them.
    #[serde(default)]
    pub snapshots: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_steps: default_total_steps(),
            seed: None,
            snapshots: 0,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the result files.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Whether snapshot frames are written to `<directory>/frames/`.
    #[serde(default)]
    pub write_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_snapshots: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_size() -> usize {
    100
}

const fn default_initial_density() -> f64 {
    0.5
}

const fn default_sigma() -> f64 {
    1.0
}

const fn default_mu() -> f64 {
    1.0
}

const fn default_epsilon() -> f64 {
    5.0
}

const fn default_hopping() -> f64 {
    5.0
}

const fn default_total_steps() -> u64 {
    1000
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.lattice.size, 100);
        assert_eq!(config.run.total_steps, 1000);
        assert_eq!(config.run.seed, None);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.rates.constants(), RateConstants::default());
        assert!(config.to_params().is_ok());
        assert!(config.snapshot_recorder().is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
lattice:
  size: 40
  initial_density: 0.3

rates:
  sigma: 2.0
  mu: 0.5
  epsilon: 1.0
  hopping: 0.25

run:
  total_steps: 5000
  seed: 123
  snapshots: 10

output:
  directory: "results"
  write_snapshots: true

logging:
  level: "debug"
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.lattice.size, 40);
        assert!((config.rates.hopping - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.run.seed, Some(123));
        assert_eq!(config.output.directory, PathBuf::from("results"));
        assert!(config.output.write_snapshots);
        assert_eq!(config.logging.level, "debug");

        let params = config.to_params().unwrap();
        assert_eq!(params.size(), 40);
        assert_eq!(params.total_steps(), 5000);
        assert_eq!(params.seed(), Some(123));
        assert_eq!(config.snapshot_recorder().unwrap().interval(), 500);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("run:\n  seed: 7\n").unwrap();
        assert_eq!(config.run.seed, Some(7));
        assert_eq!(config.run.total_steps, 1000);
        assert_eq!(config.lattice, LatticeConfig::default());
    }

    #[test]
    fn hopping_accepts_short_name() {
        let config = SimulationConfig::parse("rates:\n  D: 9.0\n").unwrap();
        assert!((config.rates.hopping - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = SimulationConfig::parse("lattice: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let config = SimulationConfig::parse("lattice:\n  initial_density: 1.5\n").unwrap();
        assert_eq!(config.to_params(), Err(ParameterError::Density(1.5)));

        let config = SimulationConfig::parse("rates:\n  mu: -1.0\n").unwrap();
        assert!(matches!(
            config.to_params(),
            Err(ParameterError::Rate { name: "mu", .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("cyclic-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
