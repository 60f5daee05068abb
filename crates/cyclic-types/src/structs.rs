//! Record types shared by the lattice, the core, and the engine.

use serde::{Deserialize, Serialize};

use crate::enums::{Cell, EventClass, Species};

/// A lattice coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Site {
    /// Row index, `0..size`.
    pub row: usize,
    /// Column index, `0..size`.
    pub col: usize,
}

impl Site {
    /// Create a site from a row and column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl core::fmt::Display for Site {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An ordered (focal, neighbour) pair recorded by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitePair {
    /// The focal (acting) site.
    pub source: Site,
    /// The neighbouring site acted upon.
    pub target: Site,
}

/// One concrete elementary event chosen for application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// The reaction to apply.
    pub class: EventClass,
    /// The focal site.
    pub source: Site,
    /// The neighbouring site.
    pub target: Site,
}

impl Event {
    /// Build an event from a class and a recorded pair.
    pub const fn from_pair(class: EventClass, pair: SitePair) -> Self {
        Self {
            class,
            source: pair.source,
            target: pair.target,
        }
    }
}

/// Per-species population counts of one lattice state.
///
/// `a + b + c + empty` always equals the number of lattice sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    /// Number of A individuals.
    pub a: u32,
    /// Number of B individuals.
    pub b: u32,
    /// Number of C individuals.
    pub c: u32,
    /// Number of empty sites.
    pub empty: u32,
}

impl Census {
    /// Add one cell to the tally. Saturates rather than overflowing.
    pub const fn record(&mut self, cell: Cell) {
        let slot = match cell {
            Cell::Empty => &mut self.empty,
            Cell::Occupied(Species::A) => &mut self.a,
            Cell::Occupied(Species::B) => &mut self.b,
            Cell::Occupied(Species::C) => &mut self.c,
        };
        *slot = slot.saturating_add(1);
    }

    /// Count for one species.
    pub const fn count(&self, species: Species) -> u32 {
        match species {
            Species::A => self.a,
            Species::B => self.b,
            Species::C => self.c,
        }
    }

    /// Number of occupied sites.
    pub const fn occupied(&self) -> u32 {
        self.a.saturating_add(self.b).saturating_add(self.c)
    }

    /// Total number of sites (occupied plus empty).
    pub const fn total(&self) -> u32 {
        self.occupied().saturating_add(self.empty)
    }

    /// Fractions of the occupied total, in `[a, b, c]` order.
    ///
    /// Returns all zeros when nothing is occupied.
    pub fn fractions(&self) -> [f64; 3] {
        let occupied = self.occupied();
        if occupied == 0 {
            return [0.0; 3];
        }
        let total = f64::from(occupied);
        [
            f64::from(self.a) / total,
            f64::from(self.b) / total,
            f64::from(self.c) / total,
        ]
    }
}
