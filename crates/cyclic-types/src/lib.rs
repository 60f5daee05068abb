//! Shared type definitions for the cyclic-competition lattice simulation.
//!
//! This crate is the single source of truth for the closed tag sets
//! (species, cell states, event classes, terminal states) and the small
//! records passed between the lattice, the core, and the engine.
//!
//! # Modules
//!
//! - [`ids`] -- UUID wrapper identifying a simulation run
//! - [`enums`] -- Species, cell states, event classes, terminal states
//! - [`structs`] -- Sites, events, and per-step census records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Cell, Duel, EventClass, Species, TerminalState};
pub use ids::RunId;
pub use structs::{Census, Event, Site, SitePair};
