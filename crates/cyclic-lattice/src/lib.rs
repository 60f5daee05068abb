//! Toroidal lattice for the cyclic-competition simulation.
//!
//! This crate models the physical space of the simulation: a square grid
//! with periodic boundaries in which every site is empty or holds one
//! individual of species A, B, or C.
//!
//! # Modules
//!
//! - [`error`] -- Error types for lattice construction and access.
//! - [`lattice`] -- [`Lattice`] storage, random fill, census, and exports.
//! - [`neighborhood`] -- Moore neighbourhood offsets with wraparound.

pub mod error;
pub mod lattice;
pub mod neighborhood;

// Re-export primary types at crate root.
pub use error::LatticeError;
pub use lattice::Lattice;
pub use neighborhood::{MOORE_OFFSETS, Shift, moore_neighbours};
