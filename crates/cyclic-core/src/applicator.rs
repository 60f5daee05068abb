//! Event application: the only code that mutates the lattice during a run.

use cyclic_lattice::{Lattice, LatticeError};
use cyclic_types::{Cell, Duel, Event, EventClass, Site};

/// Apply one event to the lattice in place.
///
/// - `Competition`: the dominated occupant of the pair is removed.
/// - `Reproduction`: the target takes the source's species.
/// - `Hopping`, `PairExchange`: the two cells swap contents.
///
/// Events drawn from a catalog built on the current lattice always satisfy
/// their preconditions. A competition between two individuals of the same
/// species, or any event whose source is empty, leaves the lattice as is.
///
/// # Errors
///
/// Returns [`LatticeError::OutOfBounds`] if either site is outside the lattice.
pub fn apply(lattice: &mut Lattice, event: &Event) -> Result<(), LatticeError> {
    let source = cell_at(lattice, event.source)?;
    let target = cell_at(lattice, event.target)?;

    match event.class {
        EventClass::Competition => {
            if let (Cell::Occupied(attacker), Cell::Occupied(defender)) = (source, target) {
                match attacker.duel(defender) {
                    Duel::SourceWins => {
                        lattice.set(event.target, Cell::Empty)?;
                    }
                    Duel::TargetWins => {
                        lattice.set(event.source, Cell::Empty)?;
                    }
                    Duel::Tie => {}
                }
            }
        }
        EventClass::Reproduction => {
            if let Cell::Occupied(parent) = source {
                lattice.set(event.target, Cell::Occupied(parent))?;
            }
        }
        EventClass::Hopping | EventClass::PairExchange => {
            lattice.swap(event.source, event.target)?;
        }
    }
    Ok(())
}

fn cell_at(lattice: &Lattice, site: Site) -> Result<Cell, LatticeError> {
    lattice.get(site).ok_or(LatticeError::OutOfBounds {
        site,
        size: lattice.size(),
    })
}
