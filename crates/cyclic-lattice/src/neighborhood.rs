//! Moore neighbourhood geometry on a torus.
//!
//! The lattice has no edges: every coordinate step wraps modulo the side
//! length. Offsets are unit steps only, so wrapping never needs signed
//! arithmetic or a modulo.

use cyclic_types::Site;

/// A unit step along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    /// One step towards index 0 (wraps to `size - 1`).
    Back,
    /// No movement.
    Stay,
    /// One step away from index 0 (wraps to 0).
    Forward,
}

impl Shift {
    /// Apply this step to a coordinate on an axis of length `size`.
    ///
    /// `coord` must already be in `0..size`.
    pub const fn apply(self, coord: usize, size: usize) -> usize {
        match self {
            Self::Stay => coord,
            Self::Forward => {
                let next = coord.saturating_add(1);
                if next >= size { 0 } else { next }
            }
            Self::Back => {
                if coord == 0 {
                    size.saturating_sub(1)
                } else {
                    coord.saturating_sub(1)
                }
            }
        }
    }
}

/// The eight `(row, col)` offsets of the Moore neighbourhood.
///
/// The order fixes the insertion order of catalog pairs within a class:
/// E, S, W, N, SE, SW, NE, NW.
pub const MOORE_OFFSETS: [(Shift, Shift); 8] = [
    (Shift::Stay, Shift::Forward),
    (Shift::Forward, Shift::Stay),
    (Shift::Stay, Shift::Back),
    (Shift::Back, Shift::Stay),
    (Shift::Forward, Shift::Forward),
    (Shift::Forward, Shift::Back),
    (Shift::Back, Shift::Forward),
    (Shift::Back, Shift::Back),
];

/// Iterate over the eight wrapped neighbours of `site` on a `size`-sided torus.
///
/// On lattices smaller than 3 the same neighbour (or the site itself) can
/// appear more than once; every offset is still yielded.
pub fn moore_neighbours(site: Site, size: usize) -> impl Iterator<Item = Site> {
    MOORE_OFFSETS.into_iter().map(move |(dr, dc)| {
        Site::new(dr.apply(site.row, size), dc.apply(site.col, size))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_site_has_eight_distinct_neighbours() {
        let mut neighbours: Vec<Site> = moore_neighbours(Site::new(2, 2), 5).collect();
        neighbours.sort();
        neighbours.dedup();
        assert_eq!(neighbours.len(), 8);
        assert!(!neighbours.contains(&Site::new(2, 2)));
    }

    #[test]
    fn corner_wraps_around_both_axes() {
        let neighbours: Vec<Site> = moore_neighbours(Site::new(0, 0), 4).collect();
        assert_eq!(
            neighbours,
            vec![
                Site::new(0, 1),
                Site::new(1, 0),
                Site::new(0, 3),
                Site::new(3, 0),
                Site::new(1, 1),
                Site::new(1, 3),
                Site::new(3, 1),
                Site::new(3, 3),
            ]
        );
    }

    #[test]
    fn single_cell_torus_is_its_own_neighbour() {
        let origin = Site::new(0, 0);
        assert!(moore_neighbours(origin, 1).all(|n| n == origin));
    }

    #[test]
    fn shift_wraps_at_both_ends() {
        assert_eq!(Shift::Forward.apply(4, 5), 0);
        assert_eq!(Shift::Back.apply(0, 5), 4);
        assert_eq!(Shift::Stay.apply(3, 5), 3);
    }
}
