//! Enumeration types for the cyclic-competition simulation.
//!
//! Lattice states and event classes are closed sets. Every `match` over
//! them is checked for exhaustiveness by the compiler, so there is no
//! "unknown tag" path anywhere in the simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// One of the three cyclically competing species.
///
/// Dominance is cyclic: A beats B, B beats C, C beats A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Species A (dominates B).
    A,
    /// Species B (dominates C).
    B,
    /// Species C (dominates A).
    C,
}

impl Species {
    /// All species in census order.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// The species this one removes in a competition event.
    pub const fn prey(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::A,
        }
    }

    /// Whether `self` dominates `other`.
    pub fn dominates(self, other: Self) -> bool {
        self.prey() == other
    }

    /// Resolve a competition between a source and a target occupant.
    pub fn duel(self, target: Self) -> Duel {
        if self.dominates(target) {
            Duel::SourceWins
        } else if target.dominates(self) {
            Duel::TargetWins
        } else {
            Duel::Tie
        }
    }

    /// Numeric lattice code (A = 1, B = 2, C = 3).
    pub const fn code(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
        }
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(label)
    }
}

/// Outcome of a competition between two occupants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duel {
    /// The source dominates; the target is removed.
    SourceWins,
    /// The target dominates; the source is removed.
    TargetWins,
    /// Same species. Never produced by the catalog, leaves both cells alone.
    Tie,
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// The content of a single lattice site.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Cell {
    /// No occupant.
    #[default]
    Empty,
    /// Occupied by one individual of the given species.
    Occupied(Species),
}

impl Cell {
    /// Numeric code used by text exports (empty = 0, A = 1, B = 2, C = 3).
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Occupied(species) => species.code(),
        }
    }

    /// Decode a numeric lattice code. Returns `None` for codes above 3.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Occupied(Species::A)),
            2 => Some(Self::Occupied(Species::B)),
            3 => Some(Self::Occupied(Species::C)),
            _ => None,
        }
    }

    /// The occupant, if any.
    pub const fn species(self) -> Option<Species> {
        match self {
            Self::Empty => None,
            Self::Occupied(species) => Some(species),
        }
    }

    /// Whether the site is empty.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Species> for Cell {
    fn from(species: Species) -> Self {
        Self::Occupied(species)
    }
}

// ---------------------------------------------------------------------------
// Event classes
// ---------------------------------------------------------------------------

/// The four elementary reactions of the model.
///
/// Declaration order is the order of the rate vector and of the cumulative
/// scan used for class selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventClass {
    /// `X + Y -> X + 0` when X dominates Y (rate `sigma`).
    Competition,
    /// `X + Y -> Y + X` for different species (rate `epsilon`).
    PairExchange,
    /// `X + 0 -> X + X` (rate `mu`).
    Reproduction,
    /// `X + 0 -> 0 + X` (rate `D`).
    Hopping,
}

impl EventClass {
    /// All classes in rate-vector order.
    pub const ALL: [Self; 4] = [
        Self::Competition,
        Self::PairExchange,
        Self::Reproduction,
        Self::Hopping,
    ];

    /// Position of this class in the rate vector.
    pub const fn index(self) -> usize {
        match self {
            Self::Competition => 0,
            Self::PairExchange => 1,
            Self::Reproduction => 2,
            Self::Hopping => 3,
        }
    }
}

impl core::fmt::Display for EventClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Competition => "competition",
            Self::PairExchange => "pair-exchange",
            Self::Reproduction => "reproduction",
            Self::Hopping => "hopping",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Run lifecycle
// ---------------------------------------------------------------------------

/// Why a simulation run stopped.
///
/// Every variant carries the same partial-progress guarantee: the lattice,
/// clocks and census history accumulated so far are returned intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// No occupied cells remain.
    TerminatedEmpty,
    /// The total event rate was zero; no legal event exists.
    TerminatedNoRate,
    /// The configured step budget was exhausted.
    CompletedMaxSteps,
    /// A step observer asked the driver to stop between steps.
    Stopped,
}

impl core::fmt::Display for TerminalState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::TerminatedEmpty => "terminated-empty",
            Self::TerminatedNoRate => "terminated-no-rate",
            Self::CompletedMaxSteps => "completed-max-steps",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}
