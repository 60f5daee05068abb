//! Simulation driver: the Gillespie step loop and its state machine.
//!
//! ```text
//! Initializing ──first step──▶ Running ──┬──▶ TerminatedNoRate   (total rate 0)
//!                                        ├──▶ TerminatedEmpty    (no occupants)
//!                                        ├──▶ CompletedMaxSteps  (budget spent)
//!                                        └──▶ Stopped            (observer break)
//! ```
//!
//! Each step is strictly sequential: build the catalog from the lattice the
//! previous step left behind, select, apply, then append to the clock and
//! the census history. Every terminal state keeps the partial results.
//!
//! A single seeded [`StdRng`] serves every draw of a run (lattice fill,
//! waiting times, class and pair choice), so a run is reproducible from its
//! seed. When no seed is given one is drawn from the thread generator and
//! reported in the [`RunResult`].

use cyclic_lattice::Lattice;
use cyclic_types::{Census, RunId, Species, TerminalState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::applicator;
use crate::catalog::EventCatalog;
use crate::clock::GillespieClock;
use crate::error::{CoreError, ParameterError};
use crate::observer::{NoOpObserver, StepObserver, StepRecord};
use crate::params::RunParams;
use crate::selector;

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Lattice filled, no step taken yet.
    Initializing,
    /// At least one step has been attempted.
    Running,
    /// The run is over; further steps do nothing.
    Terminal(TerminalState),
}

/// Result of a single call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// One event fired.
    Advanced(StepRecord),
    /// No event fired because the run has ended.
    Finished(TerminalState),
}

/// A steppable Gillespie run.
#[derive(Debug)]
pub struct Simulation {
    run_id: RunId,
    params: RunParams,
    seed: u64,
    rng: StdRng,
    lattice: Lattice,
    clock: GillespieClock,
    history: Vec<Census>,
    steps: u64,
    state: DriverState,
}

impl Simulation {
    /// Start a run on a uniformly random lattice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Lattice`] if the lattice cannot be created.
    pub fn new(params: RunParams) -> Result<Self, CoreError> {
        let seed = resolve_seed(params.seed());
        let mut rng = StdRng::seed_from_u64(seed);
        let lattice = Lattice::random(params.size(), params.initial_density(), &mut rng)?;
        Ok(Self::assemble(params, seed, rng, lattice))
    }

    /// Start a run on a caller-supplied lattice.
    ///
    /// The initial density in `params` is ignored; the lattice size must
    /// match `params.size()`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::SizeMismatch`] if the sizes differ.
    pub fn from_lattice(params: RunParams, lattice: Lattice) -> Result<Self, CoreError> {
        if lattice.size() != params.size() {
            return Err(ParameterError::SizeMismatch {
                expected: params.size(),
                actual: lattice.size(),
            }
            .into());
        }
        let seed = resolve_seed(params.seed());
        let rng = StdRng::seed_from_u64(seed);
        Ok(Self::assemble(params, seed, rng, lattice))
    }

    fn assemble(params: RunParams, seed: u64, rng: StdRng, lattice: Lattice) -> Self {
        let initial = lattice.census();
        Self {
            run_id: RunId::new(),
            params,
            seed,
            rng,
            lattice,
            clock: GillespieClock::new(),
            history: vec![initial],
            steps: 0,
            state: DriverState::Initializing,
        }
    }

    /// Execute one Gillespie step.
    ///
    /// Once the run has reached a terminal state this returns
    /// [`StepOutcome::Finished`] without touching the lattice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if an event refers to a site outside the
    /// lattice or the clock rejects the waiting time. Neither happens for
    /// events drawn from a freshly built catalog.
    pub fn step(&mut self) -> Result<StepOutcome, CoreError> {
        if let DriverState::Terminal(terminal) = self.state {
            return Ok(StepOutcome::Finished(terminal));
        }
        if self.steps >= self.params.total_steps() {
            return Ok(self.terminate(TerminalState::CompletedMaxSteps));
        }
        self.state = DriverState::Running;

        let catalog = EventCatalog::build(&self.lattice, self.params.rates());
        let Some(selection) = selector::select(&catalog, &mut self.rng) else {
            return Ok(self.terminate(TerminalState::TerminatedNoRate));
        };

        let population = self.census().occupied();
        applicator::apply(&mut self.lattice, &selection.event)?;
        let time = self.clock.advance(selection.tau, population)?;

        let census = self.lattice.census();
        self.history.push(census);
        self.steps = self.steps.saturating_add(1);

        let record = StepRecord {
            step: self.steps,
            event: selection.event,
            tau: selection.tau,
            time,
            per_capita_time: self.clock.per_capita_now(),
            total_rate: selection.total_rate,
            census,
        };
        trace!(
            step = record.step,
            class = %record.event.class,
            source = %record.event.source,
            target = %record.event.target,
            tau = record.tau,
            total_rate = record.total_rate,
            "Event applied"
        );

        if census.occupied() == 0 {
            self.terminate(TerminalState::TerminatedEmpty);
        }
        Ok(StepOutcome::Advanced(record))
    }

    /// Step until a terminal state, notifying `observer` after every step.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Simulation::step`].
    pub fn run(mut self, observer: &mut dyn StepObserver) -> Result<RunResult, CoreError> {
        let rates = self.params.rates();
        info!(
            run_id = %self.run_id,
            seed = self.seed,
            size = self.params.size(),
            initial_density = self.params.initial_density(),
            total_steps = self.params.total_steps(),
            sigma = rates.sigma,
            mu = rates.mu,
            epsilon = rates.epsilon,
            hopping = rates.hopping,
            "Simulation starting"
        );

        observer.on_start(&self.lattice);
        loop {
            match self.step()? {
                StepOutcome::Finished(terminal) => return Ok(self.into_result(terminal)),
                StepOutcome::Advanced(record) => {
                    let stop = observer.on_step(&record, &self.lattice).is_break();
                    if stop && !self.is_terminal() {
                        self.terminate(TerminalState::Stopped);
                    }
                }
            }
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Whether the run has ended.
    pub const fn is_terminal(&self) -> bool {
        matches!(self.state, DriverState::Terminal(_))
    }

    /// Identifier of this run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Seed of the run generator.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps executed so far.
    pub const fn steps_executed(&self) -> u64 {
        self.steps
    }

    /// Current lattice.
    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Model and per-capita clocks.
    pub const fn clock(&self) -> &GillespieClock {
        &self.clock
    }

    /// Census history, initial state first.
    pub fn history(&self) -> &[Census] {
        &self.history
    }

    /// Census of the current lattice.
    pub fn census(&self) -> Census {
        self.history.last().copied().unwrap_or_default()
    }

    fn terminate(&mut self, terminal: TerminalState) -> StepOutcome {
        self.state = DriverState::Terminal(terminal);
        info!(
            run_id = %self.run_id,
            state = %terminal,
            steps = self.steps,
            time = self.clock.now(),
            per_capita_time = self.clock.per_capita_now(),
            occupied = self.census().occupied(),
            "Simulation ended"
        );
        StepOutcome::Finished(terminal)
    }

    fn into_result(self, terminal: TerminalState) -> RunResult {
        let (times, per_capita_times) = self.clock.into_series();
        RunResult {
            run_id: self.run_id,
            seed: self.seed,
            params: self.params,
            terminal,
            steps_executed: self.steps,
            lattice: self.lattice,
            times,
            per_capita_times,
            history: self.history,
        }
    }
}

/// Everything a finished run produced.
///
/// `times`, `per_capita_times`, and `history` all have length
/// `steps_executed + 1`; index 0 describes the initial lattice.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Seed of the run generator.
    pub seed: u64,
    /// Parameters the run was started with.
    pub params: RunParams,
    /// Why the run ended.
    pub terminal: TerminalState,
    /// Number of events applied.
    pub steps_executed: u64,
    /// Final lattice.
    pub lattice: Lattice,
    /// Model time series.
    pub times: Vec<f64>,
    /// Per-capita time series.
    pub per_capita_times: Vec<f64>,
    /// Census of the lattice at every recorded step.
    pub history: Vec<Census>,
}

impl RunResult {
    /// One species' population series.
    pub fn species_counts(&self, species: Species) -> Vec<u32> {
        self.history.iter().map(|c| c.count(species)).collect()
    }

    /// Population series for A, B, and C.
    pub fn population_counts(&self) -> [Vec<u32>; 3] {
        Species::ALL.map(|species| self.species_counts(species))
    }

    /// Empty-site series.
    pub fn empty_counts(&self) -> Vec<u32> {
        self.history.iter().map(|c| c.empty).collect()
    }

    /// Per-step `[a, b, c]` fractions of the occupied population.
    pub fn fractions(&self) -> Vec<[f64; 3]> {
        self.history.iter().map(Census::fractions).collect()
    }

    /// Model time at the end of the run.
    pub fn final_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Per-capita time at the end of the run.
    pub fn final_per_capita_time(&self) -> f64 {
        self.per_capita_times.last().copied().unwrap_or(0.0)
    }
}

/// Run to completion on a random lattice.
///
/// # Errors
///
/// Returns [`CoreError`] if the lattice cannot be created or a step fails.
pub fn run(params: RunParams) -> Result<RunResult, CoreError> {
    Simulation::new(params)?.run(&mut NoOpObserver)
}

/// Run to completion on a random lattice with an observer attached.
///
/// # Errors
///
/// Returns [`CoreError`] if the lattice cannot be created or a step fails.
pub fn run_with_observer(
    params: RunParams,
    observer: &mut dyn StepObserver,
) -> Result<RunResult, CoreError> {
    Simulation::new(params)?.run(observer)
}

/// Run to completion on a caller-supplied lattice.
///
/// # Errors
///
/// Returns [`CoreError`] if the lattice size does not match or a step fails.
pub fn run_from_lattice(params: RunParams, lattice: Lattice) -> Result<RunResult, CoreError> {
    Simulation::from_lattice(params, lattice)?.run(&mut NoOpObserver)
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let drawn = rand::rng().random();
        debug!(seed = drawn, "No seed supplied, drew one from the thread generator");
        drawn
    })
}
