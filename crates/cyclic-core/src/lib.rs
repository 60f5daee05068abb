//! Gillespie engine for the spatial rock-paper-scissors lattice model.
//!
//! Each step rebuilds the full event catalog from the lattice, draws an
//! exponential waiting time and one concrete event, applies it, and advances
//! the model and per-capita clocks.
//!
//! # Modules
//!
//! - [`params`] -- Validated run parameters and rate constants.
//! - [`catalog`] -- Per-class rates and ordered neighbour pairs from one
//!   lattice scan.
//! - [`selector`] -- Waiting-time, class, and pair draws.
//! - [`applicator`] -- Event application on the lattice.
//! - [`clock`] -- Model time and per-capita time series.
//! - [`observer`] -- [`StepObserver`] trait and [`SnapshotRecorder`].
//! - [`driver`] -- [`Simulation`] state machine and the one-shot [`run`].
//! - [`config`] -- YAML configuration into strongly-typed structs.
//!
//! [`StepObserver`]: observer::StepObserver
//! [`SnapshotRecorder`]: observer::SnapshotRecorder
//! [`Simulation`]: driver::Simulation
//! [`run`]: driver::run

pub mod applicator;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod observer;
pub mod params;
pub mod selector;

pub use driver::{
    DriverState, RunResult, Simulation, StepOutcome, run, run_from_lattice, run_with_observer,
};
pub use error::{ClockError, CoreError, ParameterError};
pub use observer::{NoOpObserver, Snapshot, SnapshotRecorder, StepObserver, StepRecord};
pub use params::{RateConstants, RunParams};
