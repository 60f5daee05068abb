//! Continuous-time clock of a Gillespie run.
//!
//! Two append-only series advance together, one entry per executed event:
//!
//! - `t`, the elapsed model time, incremented by the waiting time τ;
//! - `mcs`, the per-capita time, incremented by τ divided by the number of
//!   occupied sites before the event. It makes runs with different
//!   population sizes comparable.
//!
//! Both series start with a single `0.0` entry for the initial state.

use serde::Serialize;

use crate::error::ClockError;

/// Model time and per-capita time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GillespieClock {
    times: Vec<f64>,
    per_capita_times: Vec<f64>,
}

impl GillespieClock {
    /// A clock at `t = 0`, `mcs = 0`.
    pub fn new() -> Self {
        Self {
            times: vec![0.0],
            per_capita_times: vec![0.0],
        }
    }

    /// Advance both series by one event.
    ///
    /// `population` is the number of occupied sites before the event fired.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidWait`] for a negative or non-finite τ and
    /// [`ClockError::ZeroPopulation`] when `population` is zero. The clock is
    /// left unchanged on error.
    pub fn advance(&mut self, tau: f64, population: u32) -> Result<f64, ClockError> {
        if !tau.is_finite() || tau < 0.0 {
            return Err(ClockError::InvalidWait(tau));
        }
        if population == 0 {
            return Err(ClockError::ZeroPopulation);
        }

        let now = self.now() + tau;
        let per_capita = self.per_capita_now() + tau / f64::from(population);
        self.times.push(now);
        self.per_capita_times.push(per_capita);
        Ok(now)
    }

    /// Current model time.
    pub fn now(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Current per-capita time.
    pub fn per_capita_now(&self) -> f64 {
        self.per_capita_times.last().copied().unwrap_or(0.0)
    }

    /// Model time series, initial entry included.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Per-capita time series, initial entry included.
    pub fn per_capita_times(&self) -> &[f64] {
        &self.per_capita_times
    }

    /// Number of events the clock has recorded.
    pub fn events(&self) -> usize {
        self.times.len().saturating_sub(1)
    }

    /// Consume the clock, returning `(times, per_capita_times)`.
    pub fn into_series(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.per_capita_times)
    }
}

impl Default for GillespieClock {
    fn default() -> Self {
        Self::new()
    }
}
