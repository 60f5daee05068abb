//! Validated run parameters.
//!
//! [`RunParams`] is the only way into the driver. Construction validates
//! every field, so the simulation itself never re-checks its inputs.

use serde::Serialize;

use crate::error::ParameterError;

/// Largest side length whose N² still fits a `u32` census counter.
pub const MAX_LATTICE_SIZE: usize = 65_535;

/// Per-pair rate constants of the four reactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateConstants {
    /// Competition (dominance-removal) rate.
    pub sigma: f64,
    /// Reproduction rate into an empty neighbour.
    pub mu: f64,
    /// Pair-exchange rate between different species.
    pub epsilon: f64,
    /// Hopping rate into an empty neighbour (`D`).
    pub hopping: f64,
}

impl RateConstants {
    /// Check that every constant is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Rate`] naming the first offending constant.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("sigma", self.sigma),
            ("mu", self.mu),
            ("epsilon", self.epsilon),
            ("D", self.hopping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterError::Rate { name, value });
            }
        }
        Ok(())
    }

    /// Upper bound on the total catalog rate of a `size`×`size` lattice.
    ///
    /// Every site has eight ordered neighbour pairs and each pair carries
    /// at most the sum of the four constants.
    pub fn max_total_rate(&self, size: usize) -> f64 {
        let sites = u32::try_from(size.saturating_mul(size)).map_or(f64::from(u32::MAX), f64::from);
        8.0 * sites * (self.sigma + self.mu + self.epsilon + self.hopping)
    }
}

impl Default for RateConstants {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            mu: 1.0,
            epsilon: 5.0,
            hopping: 5.0,
        }
    }
}

/// Everything the driver needs to start a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunParams {
    size: usize,
    initial_density: f64,
    total_steps: u64,
    rates: RateConstants,
    seed: Option<u64>,
}

impl RunParams {
    /// Validate and bundle run parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if the size is zero or too large, the
    /// density is outside `[0, 1]`, any rate is negative or not finite, or
    /// the total rate of a full catalog would overflow.
    pub fn new(
        size: usize,
        initial_density: f64,
        total_steps: u64,
        rates: RateConstants,
        seed: Option<u64>,
    ) -> Result<Self, ParameterError> {
        if size == 0 {
            return Err(ParameterError::ZeroSize);
        }
        if size > MAX_LATTICE_SIZE {
            return Err(ParameterError::SizeTooLarge(size));
        }
        if !initial_density.is_finite() || !(0.0..=1.0).contains(&initial_density) {
            return Err(ParameterError::Density(initial_density));
        }
        rates.validate()?;
        // Headroom for rounding while the catalog accumulates pair by pair.
        if !(rates.max_total_rate(size) * 2.0).is_finite() {
            return Err(ParameterError::RateOverflow { size });
        }
        Ok(Self {
            size,
            initial_density,
            total_steps,
            rates,
            seed,
        })
    }

    /// Lattice side length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Probability that a site starts occupied.
    pub const fn initial_density(&self) -> f64 {
        self.initial_density
    }

    /// Step budget.
    pub const fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Reaction rate constants.
    pub const fn rates(&self) -> &RateConstants {
        &self.rates
    }

    /// Explicit seed, if one was given.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}
