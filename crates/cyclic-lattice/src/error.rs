//! Error types for the `cyclic-lattice` crate.
//!
//! All fallible operations in this crate return [`LatticeError`] through the
//! standard [`Result`] type.

use cyclic_types::Site;

/// Errors that can occur during lattice construction or access.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    /// A lattice must have at least one row and one column.
    #[error("lattice size must be at least 1")]
    ZeroSize,

    /// The number of sites does not fit the census counters.
    #[error("lattice size {size} is too large ({size}x{size} sites exceed u32)")]
    TooLarge {
        /// Requested side length.
        size: usize,
    },

    /// A site lies outside the lattice.
    #[error("site {site} is outside a {size}x{size} lattice")]
    OutOfBounds {
        /// The offending site.
        site: Site,
        /// Lattice side length.
        size: usize,
    },

    /// Caller-supplied rows do not form a square grid.
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare {
        /// Index of the malformed row.
        row: usize,
        /// Its length.
        len: usize,
        /// Expected side length.
        size: usize,
    },

    /// Caller-supplied data contains a code outside `0..=3`.
    #[error("unknown cell code {code} at {site}")]
    UnknownCode {
        /// The unrecognised code.
        code: u8,
        /// Where it was found.
        site: Site,
    },

    /// The initial density is outside `[0, 1]` or not finite.
    #[error("initial density {0} is outside [0, 1]")]
    InvalidDensity(f64),
}
