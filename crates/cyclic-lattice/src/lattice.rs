//! The toroidal species lattice.
//!
//! [`Lattice`] stores an N×N grid of [`Cell`] values in row-major order.
//! It is created once per run and then mutated in place, one event at a
//! time. All coordinate access is bounds-checked and returns
//! [`LatticeError::OutOfBounds`] instead of panicking.

use cyclic_types::{Census, Cell, Site, Species};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::LatticeError;
use crate::neighborhood;

/// Square lattice with periodic boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lattice {
    /// Side length N.
    size: usize,
    /// N×N cells, row-major.
    cells: Vec<Cell>,
}

impl Lattice {
    /// Create a lattice with every site set to `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::ZeroSize`] for `size == 0` and
    /// [`LatticeError::TooLarge`] when N² does not fit a `u32` census.
    pub fn filled(size: usize, cell: Cell) -> Result<Self, LatticeError> {
        let site_count = site_count(size)?;
        Ok(Self {
            size,
            cells: vec![cell; site_count],
        })
    }

    /// Create an all-empty lattice.
    pub fn empty(size: usize) -> Result<Self, LatticeError> {
        Self::filled(size, Cell::Empty)
    }

    /// Fill a lattice by independent uniform assignment.
    ///
    /// Each site is occupied with probability `density`; an occupied site
    /// holds A, B, or C with equal probability. Sites are visited in
    /// row-major order, drawing the occupancy roll first and the species
    /// second, all from the single run generator.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidDensity`] if `density` is outside
    /// `[0, 1]`, plus the size errors of [`Lattice::filled`].
    pub fn random(size: usize, density: f64, rng: &mut impl Rng) -> Result<Self, LatticeError> {
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(LatticeError::InvalidDensity(density));
        }
        let mut lattice = Self::empty(size)?;
        for cell in &mut lattice.cells {
            if rng.random::<f64>() < density {
                let species = match rng.random_range(0..3_u8) {
                    0 => Species::A,
                    1 => Species::B,
                    _ => Species::C,
                };
                *cell = Cell::Occupied(species);
            }
        }

        let census = lattice.census();
        debug!(
            size,
            density,
            a = census.a,
            b = census.b,
            c = census.c,
            empty = census.empty,
            "Random lattice filled"
        );
        Ok(lattice)
    }

    /// Build a lattice from caller-supplied rows of cells.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::NotSquare`] if any row length differs from the
    /// number of rows, plus the size errors of [`Lattice::filled`].
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, LatticeError> {
        let size = rows.len();
        let site_count = site_count(size)?;
        let mut cells = Vec::with_capacity(site_count);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(LatticeError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self { size, cells })
    }

    /// Build a lattice from rows of numeric codes (0 = empty, 1..=3 = A..C).
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UnknownCode`] for codes above 3, plus the
    /// errors of [`Lattice::from_rows`].
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, LatticeError> {
        let decoded = rows
            .iter()
            .enumerate()
            .map(|(row, codes)| {
                codes
                    .iter()
                    .enumerate()
                    .map(|(col, &code)| {
                        Cell::from_code(code).ok_or(LatticeError::UnknownCode {
                            code,
                            site: Site::new(row, col),
                        })
                    })
                    .collect::<Result<Vec<Cell>, LatticeError>>()
            })
            .collect::<Result<Vec<Vec<Cell>>, LatticeError>>()?;
        Self::from_rows(&decoded)
    }

    /// Side length N.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of sites (N²).
    pub fn site_count(&self) -> usize {
        self.cells.len()
    }

    /// The cell at `site`, or `None` if the site is outside the lattice.
    pub fn get(&self, site: Site) -> Option<Cell> {
        let idx = self.index(site).ok()?;
        self.cells.get(idx).copied()
    }

    /// Overwrite the cell at `site`, returning the previous content.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::OutOfBounds`] if the site is outside the lattice.
    pub fn set(&mut self, site: Site, cell: Cell) -> Result<Cell, LatticeError> {
        let idx = self.index(site)?;
        let size = self.size;
        let slot = self
            .cells
            .get_mut(idx)
            .ok_or(LatticeError::OutOfBounds { site, size })?;
        Ok(core::mem::replace(slot, cell))
    }

    /// Exchange the contents of two sites.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::OutOfBounds`] if either site is outside the lattice.
    pub fn swap(&mut self, first: Site, second: Site) -> Result<(), LatticeError> {
        let a = self.index(first)?;
        let b = self.index(second)?;
        self.cells.swap(a, b);
        Ok(())
    }

    /// Iterate over every site and its content in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = (Site, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(idx, &cell)| {
            let row = idx.checked_div(size).unwrap_or(0);
            let col = idx.checked_rem(size).unwrap_or(0);
            (Site::new(row, col), cell)
        })
    }

    /// The eight wrapped Moore neighbours of `site`.
    pub fn neighbours(&self, site: Site) -> impl Iterator<Item = Site> {
        neighborhood::moore_neighbours(site, self.size)
    }

    /// Iterate over the rows of the lattice.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Per-species counts of the current state.
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for &cell in &self.cells {
            census.record(cell);
        }
        census
    }

    /// Number of occupied sites.
    pub fn occupied(&self) -> u32 {
        self.census().occupied()
    }

    /// Row-by-row numeric codes, the shape written by text exports.
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }

    /// Flat index of a site, bounds-checked.
    fn index(&self, site: Site) -> Result<usize, LatticeError> {
        let out_of_bounds = LatticeError::OutOfBounds {
            site,
            size: self.size,
        };
        if site.row >= self.size || site.col >= self.size {
            return Err(out_of_bounds);
        }
        site.row
            .checked_mul(self.size)
            .and_then(|offset| offset.checked_add(site.col))
            .ok_or(out_of_bounds)
    }
}

/// Validate a side length and return N².
fn site_count(size: usize) -> Result<usize, LatticeError> {
    if size == 0 {
        return Err(LatticeError::ZeroSize);
    }
    let count = size
        .checked_mul(size)
        .ok_or(LatticeError::TooLarge { size })?;
    if u32::try_from(count).is_err() {
        return Err(LatticeError::TooLarge { size });
    }
    Ok(count)
}
