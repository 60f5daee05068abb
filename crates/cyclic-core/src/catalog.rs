//! Rate and event catalog built from a full lattice scan.
//!
//! For every occupied focal site and each of its eight wrapped Moore
//! neighbours:
//!
//! | Neighbour            | Recorded classes              | Rate added        |
//! |----------------------|-------------------------------|-------------------|
//! | empty                | `Reproduction`, `Hopping`     | `mu`, `D`         |
//! | different species    | `Competition`, `PairExchange` | `sigma`, `epsilon`|
//! | same species         | nothing                       | --                |
//!
//! Pairs are ordered `(focal, neighbour)`, so every physical contact is
//! enumerated once from each endpoint. This directional double counting is
//! part of the model's rate normalisation and must not be collapsed into
//! unordered pairs.
//!
//! The catalog is rebuilt from scratch every step. A single event can change
//! the rates of up to sixteen neighbour relations at once, so no state is
//! carried between builds.

use cyclic_lattice::Lattice;
use cyclic_types::{Cell, EventClass, SitePair};
use tracing::trace;

use crate::params::RateConstants;

/// Aggregate rate per event class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateVector {
    /// Sum of `sigma` over all competition pairs.
    pub competition: f64,
    /// Sum of `epsilon` over all pair-exchange pairs.
    pub pair_exchange: f64,
    /// Sum of `mu` over all reproduction pairs.
    pub reproduction: f64,
    /// Sum of `D` over all hopping pairs.
    pub hopping: f64,
}

impl RateVector {
    /// The aggregate for one class.
    pub const fn get(&self, class: EventClass) -> f64 {
        match class {
            EventClass::Competition => self.competition,
            EventClass::PairExchange => self.pair_exchange,
            EventClass::Reproduction => self.reproduction,
            EventClass::Hopping => self.hopping,
        }
    }

    /// Sum of all four aggregates.
    pub fn total(&self) -> f64 {
        self.competition + self.pair_exchange + self.reproduction + self.hopping
    }

    /// The aggregates in class order.
    pub fn as_array(&self) -> [f64; 4] {
        EventClass::ALL.map(|class| self.get(class))
    }

    const fn slot_mut(&mut self, class: EventClass) -> &mut f64 {
        match class {
            EventClass::Competition => &mut self.competition,
            EventClass::PairExchange => &mut self.pair_exchange,
            EventClass::Reproduction => &mut self.reproduction,
            EventClass::Hopping => &mut self.hopping,
        }
    }
}

/// Recorded site pairs, partitioned by class during the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassPairs {
    competition: Vec<SitePair>,
    pair_exchange: Vec<SitePair>,
    reproduction: Vec<SitePair>,
    hopping: Vec<SitePair>,
}

impl ClassPairs {
    const fn get(&self, class: EventClass) -> &Vec<SitePair> {
        match class {
            EventClass::Competition => &self.competition,
            EventClass::PairExchange => &self.pair_exchange,
            EventClass::Reproduction => &self.reproduction,
            EventClass::Hopping => &self.hopping,
        }
    }

    const fn get_mut(&mut self, class: EventClass) -> &mut Vec<SitePair> {
        match class {
            EventClass::Competition => &mut self.competition,
            EventClass::PairExchange => &mut self.pair_exchange,
            EventClass::Reproduction => &mut self.reproduction,
            EventClass::Hopping => &mut self.hopping,
        }
    }
}

/// All possible events of one lattice state, with their aggregate rates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
    rates: RateVector,
    pairs: ClassPairs,
}

impl EventCatalog {
    /// Scan the lattice and enumerate every possible event.
    pub fn build(lattice: &Lattice, constants: &RateConstants) -> Self {
        let mut catalog = Self::default();

        for (source, cell) in lattice.sites() {
            let Cell::Occupied(focal) = cell else {
                continue;
            };
            for target in lattice.neighbours(source) {
                let pair = SitePair { source, target };
                match lattice.get(target) {
                    Some(Cell::Empty) => {
                        catalog.record(EventClass::Reproduction, pair, constants.mu);
                        catalog.record(EventClass::Hopping, pair, constants.hopping);
                    }
                    Some(Cell::Occupied(other)) if other != focal => {
                        catalog.record(EventClass::Competition, pair, constants.sigma);
                        catalog.record(EventClass::PairExchange, pair, constants.epsilon);
                    }
                    Some(Cell::Occupied(_)) | None => {}
                }
            }
        }

        trace!(
            competition = catalog.pairs.competition.len(),
            pair_exchange = catalog.pairs.pair_exchange.len(),
            reproduction = catalog.pairs.reproduction.len(),
            hopping = catalog.pairs.hopping.len(),
            total_rate = catalog.total_rate(),
            "Event catalog built"
        );
        catalog
    }

    /// Aggregate rates per class.
    pub const fn rates(&self) -> &RateVector {
        &self.rates
    }

    /// Sum of all class rates.
    pub fn total_rate(&self) -> f64 {
        self.rates.total()
    }

    /// The recorded pairs of one class, in scan order.
    pub fn pairs(&self, class: EventClass) -> &[SitePair] {
        self.pairs.get(class)
    }

    /// Number of recorded pairs of one class.
    pub fn pair_count(&self, class: EventClass) -> usize {
        self.pairs.get(class).len()
    }

    /// Whether no legal event exists.
    pub fn is_empty(&self) -> bool {
        EventClass::ALL
            .iter()
            .all(|&class| self.pairs.get(class).is_empty())
    }

    fn record(&mut self, class: EventClass, pair: SitePair, rate: f64) {
        self.pairs.get_mut(class).push(pair);
        *self.rates.slot_mut(class) += rate;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cyclic_types::{Site, Species};

    use super::*;

    const E: u8 = 0;
    const A: u8 = 1;
    const B: u8 = 2;
    const C: u8 = 3;

    fn unit_rates() -> RateConstants {
        RateConstants {
            sigma: 1.0,
            mu: 1.0,
            epsilon: 1.0,
            hopping: 1.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_lattice_has_no_events() {
        let lattice = Lattice::empty(5).unwrap();
        let catalog = EventCatalog::build(&lattice, &RateConstants::default());
        assert!(catalog.is_empty());
        assert!(close(catalog.total_rate(), 0.0));
    }

    #[test]
    fn single_species_full_lattice_has_no_events() {
        let lattice = Lattice::filled(4, Cell::Occupied(Species::B)).unwrap();
        let catalog = EventCatalog::build(&lattice, &RateConstants::default());
        assert!(catalog.is_empty());
        assert!(catalog.rates().as_array().iter().all(|r| close(*r, 0.0)));
    }

    #[test]
    fn lone_individual_sees_eight_empty_neighbours() {
        let lattice = Lattice::from_codes(&[
            vec![E, E, E],
            vec![E, A, E],
            vec![E, E, E],
        ])
        .unwrap();
        let rates = RateConstants {
            sigma: 1.0,
            mu: 2.0,
            epsilon: 5.0,
            hopping: 3.0,
        };
        let catalog = EventCatalog::build(&lattice, &rates);

        assert_eq!(catalog.pair_count(EventClass::Reproduction), 8);
        assert_eq!(catalog.pair_count(EventClass::Hopping), 8);
        assert_eq!(catalog.pair_count(EventClass::Competition), 0);
        assert_eq!(catalog.pair_count(EventClass::PairExchange), 0);
        assert!(close(catalog.rates().reproduction, 16.0));
        assert!(close(catalog.rates().hopping, 24.0));
        assert!(close(catalog.total_rate(), 40.0));
        assert!(
            catalog
                .pairs(EventClass::Hopping)
                .iter()
                .all(|pair| pair.source == Site::new(1, 1))
        );
    }

    #[test]
    fn cross_species_contacts_are_counted_from_both_ends() {
        // On a 3x3 torus the eight offsets reach eight distinct sites, so
        // each occupant sees the other exactly once.
        let lattice = Lattice::from_codes(&[
            vec![A, B, E],
            vec![E, E, E],
            vec![E, E, E],
        ])
        .unwrap();
        let catalog = EventCatalog::build(&lattice, &unit_rates());

        assert_eq!(catalog.pair_count(EventClass::Competition), 2);
        assert_eq!(catalog.pair_count(EventClass::PairExchange), 2);
        // 7 empty neighbours each.
        assert_eq!(catalog.pair_count(EventClass::Reproduction), 14);
        assert_eq!(catalog.pair_count(EventClass::Hopping), 14);

        let competition = catalog.pairs(EventClass::Competition);
        assert!(competition.contains(&SitePair {
            source: Site::new(0, 0),
            target: Site::new(0, 1),
        }));
        assert!(competition.contains(&SitePair {
            source: Site::new(0, 1),
            target: Site::new(0, 0),
        }));
    }

    #[test]
    fn same_species_neighbours_contribute_nothing() {
        let lattice = Lattice::from_codes(&[
            vec![C, C, E],
            vec![E, E, E],
            vec![E, E, E],
        ])
        .unwrap();
        let catalog = EventCatalog::build(&lattice, &unit_rates());
        assert_eq!(catalog.pair_count(EventClass::Competition), 0);
        assert_eq!(catalog.pair_count(EventClass::PairExchange), 0);
        assert_eq!(catalog.pair_count(EventClass::Reproduction), 14);
    }

    #[test]
    fn full_three_species_stripes() {
        // Rows of A, B, C: every site has 2 same-species neighbours (E, W)
        // and 6 cross-species neighbours (N, S and the four diagonals).
        let lattice = Lattice::from_codes(&[
            vec![A, A, A],
            vec![B, B, B],
            vec![C, C, C],
        ])
        .unwrap();
        let rates = RateConstants {
            sigma: 1.0,
            mu: 1.0,
            epsilon: 5.0,
            hopping: 5.0,
        };
        let catalog = EventCatalog::build(&lattice, &rates);

        assert_eq!(catalog.pair_count(EventClass::Competition), 54);
        assert_eq!(catalog.pair_count(EventClass::PairExchange), 54);
        assert_eq!(catalog.pair_count(EventClass::Reproduction), 0);
        assert_eq!(catalog.pair_count(EventClass::Hopping), 0);
        assert!(close(catalog.rates().competition, 54.0));
        assert!(close(catalog.rates().pair_exchange, 270.0));
    }

    #[test]
    fn pairs_follow_scan_order() {
        let lattice = Lattice::from_codes(&[
            vec![A, E, E],
            vec![E, E, E],
            vec![E, E, B],
        ])
        .unwrap();
        let catalog = EventCatalog::build(&lattice, &unit_rates());
        let hopping = catalog.pairs(EventClass::Hopping);
        // First focal site is (0, 0); its first offset is east.
        assert_eq!(
            hopping.first(),
            Some(&SitePair {
                source: Site::new(0, 0),
                target: Site::new(0, 1),
            })
        );
        assert_eq!(hopping.last().map(|pair| pair.source), Some(Site::new(2, 2)));
    }

    #[test]
    fn zero_rate_constants_still_record_pairs() {
        let lattice = Lattice::from_codes(&[
            vec![A, B, E],
            vec![E, E, E],
            vec![E, E, E],
        ])
        .unwrap();
        let rates = RateConstants {
            sigma: 0.0,
            mu: 0.0,
            epsilon: 0.0,
            hopping: 1.0,
        };
        let catalog = EventCatalog::build(&lattice, &rates);
        assert_eq!(catalog.pair_count(EventClass::Competition), 2);
        assert!(close(catalog.rates().competition, 0.0));
        assert!(close(catalog.total_rate(), 14.0));
    }
}
