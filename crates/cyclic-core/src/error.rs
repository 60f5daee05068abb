//! Error types for the `cyclic-core` crate.
//!
//! Only parameter validation is caller-visible in normal operation.
//! Running out of legal events or occupants is a terminal state of the
//! driver, not an error.

use cyclic_lattice::LatticeError;

/// A run parameter failed validation. Raised before any simulation work.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// Lattice side length of zero.
    #[error("lattice size must be at least 1")]
    ZeroSize,

    /// Lattice too large for the `u32` census counters.
    #[error("lattice size {0} is too large")]
    SizeTooLarge(usize),

    /// Initial density outside `[0, 1]` or not finite.
    #[error("initial density must be within [0, 1], got {0}")]
    Density(f64),

    /// A rate constant is negative or not finite.
    #[error("rate `{name}` must be a finite non-negative number, got {value}")]
    Rate {
        /// Name of the offending rate constant.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The rate constants are finite but their total over a full lattice
    /// is not.
    #[error("rate constants are too large: the total rate of a {size}x{size} lattice overflows")]
    RateOverflow {
        /// Lattice side length the total was computed for.
        size: usize,
    },

    /// A caller-supplied lattice does not match the configured size.
    #[error("initial lattice is {actual}x{actual}, parameters expect {expected}x{expected}")]
    SizeMismatch {
        /// Size from the parameters.
        expected: usize,
        /// Size of the supplied lattice.
        actual: usize,
    },

    /// Snapshot recording was requested with an interval of zero steps.
    #[error("snapshot interval must be at least 1 step")]
    ZeroSnapshotInterval,
}

/// Errors that can occur while advancing the clock.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// Waiting time is negative or not finite.
    #[error("invalid waiting time {0}")]
    InvalidWait(f64),

    /// Per-capita time needs at least one occupied site.
    #[error("cannot advance per-capita time with zero population")]
    ZeroPopulation,
}

/// Top-level error for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Parameter validation failed.
    #[error("invalid parameter: {source}")]
    Parameter {
        /// The underlying validation error.
        #[from]
        source: ParameterError,
    },

    /// A lattice operation failed.
    #[error("lattice error: {source}")]
    Lattice {
        /// The underlying lattice error.
        #[from]
        source: LatticeError,
    },

    /// The clock rejected an update.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}
