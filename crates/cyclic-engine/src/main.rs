//! Engine binary for the cyclic-competition lattice simulation.
//!
//! Loads configuration, runs one Gillespie simulation to completion, and
//! writes its results to the configured output directory.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path in the first argument, or from
//!    `cyclic-config.yaml` if no argument is given
//! 2. Initialize structured logging (tracing)
//! 3. Validate run parameters
//! 4. Run the simulation with progress logging and optional snapshots
//! 5. Write densities, final lattice, frames, and the run summary

mod error;
mod export;
mod progress;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use cyclic_core::Simulation;
use cyclic_core::config::SimulationConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::export::RunSummary;
use crate::progress::EngineObserver;

/// Config file read when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "cyclic-config.yaml";

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
}

fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, source) = load_config(explicit)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("cyclic-engine starting");
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults => info!("Config file not found, using defaults"),
    }

    // 3. Validate parameters.
    let params = config.to_params().map_err(EngineError::from)?;
    info!(
        size = params.size(),
        initial_density = params.initial_density(),
        total_steps = params.total_steps(),
        seed = ?params.seed(),
        output = %config.output.directory.display(),
        "Parameters validated"
    );

    // 4. Run.
    let recorder = if config.output.write_snapshots {
        let recorder = config.snapshot_recorder();
        if recorder.is_none() {
            warn!("output.write_snapshots is set but run.snapshots is 0; no frames will be written");
        }
        recorder
    } else {
        None
    };
    let mut observer = EngineObserver::new(params.total_steps(), recorder);

    let started_at = Utc::now();
    let result = Simulation::new(params)
        .and_then(|simulation| simulation.run(&mut observer))
        .map_err(EngineError::from)?;
    let finished_at = Utc::now();

    // 5. Persist.
    let snapshots = observer.snapshots();
    let summary = RunSummary::new(&result, snapshots.len(), started_at, finished_at);
    export::write_outputs(&config.output.directory, &result, snapshots, &summary)?;

    info!(
        run_id = %result.run_id,
        seed = result.seed,
        terminal = %result.terminal,
        steps = result.steps_executed,
        final_time = result.final_time(),
        frames = snapshots.len(),
        output = %config.output.directory.display(),
        "Results written"
    );
    Ok(())
}

/// Load configuration from `explicit` if given, otherwise from
/// [`DEFAULT_CONFIG_PATH`] when it exists, otherwise use defaults.
fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<(SimulationConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok((SimulationConfig::default(), ConfigSource::Defaults));
            }
            default.to_path_buf()
        }
    };

    let config = SimulationConfig::from_file(&path)
        .map_err(EngineError::from)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok((config, ConfigSource::File(path)))
}
