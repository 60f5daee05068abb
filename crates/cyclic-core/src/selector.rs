//! Gillespie event selection.
//!
//! One selection consumes three draws from the run generator, in this
//! order:
//!
//! 1. the waiting time, exponential with rate equal to the total rate;
//! 2. the event class, by cumulative-sum inversion over the class rates;
//! 3. the concrete pair, uniform over the pairs recorded for that class.

use cyclic_types::{Event, EventClass};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::warn;

use crate::catalog::{EventCatalog, RateVector};

/// The outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Waiting time until the event fires.
    pub tau: f64,
    /// The event to apply.
    pub event: Event,
    /// Total rate of the catalog the event was drawn from.
    pub total_rate: f64,
}

/// Draw a waiting time and one concrete event from the catalog.
///
/// Returns `None` when the total rate is zero (no legal event exists).
pub fn select(catalog: &EventCatalog, rng: &mut impl Rng) -> Option<Selection> {
    let total_rate = catalog.total_rate();
    if !total_rate.is_finite() || total_rate <= 0.0 {
        return None;
    }

    let holding = Exp::new(total_rate).ok()?;
    let tau = holding.sample(rng);

    // Shift [0, 1) to (0, 1] so a zero-rate leading class can never match.
    let draw = 1.0 - rng.random::<f64>();
    let class = choose_class(catalog.rates(), draw)?;

    let pairs = catalog.pairs(class);
    if pairs.is_empty() {
        warn!(%class, "Selected class has a positive rate but no recorded pairs");
        return None;
    }
    let pair = pairs.get(rng.random_range(0..pairs.len())).copied()?;

    Some(Selection {
        tau,
        event: Event::from_pair(class, pair),
        total_rate,
    })
}

/// Pick a class by cumulative-sum inversion.
///
/// `draw` is a uniform value in `(0, 1]`. Classes are scanned left to right
/// in rate-vector order and the first class with a positive rate whose
/// cumulative share meets or exceeds `draw` wins. If rounding leaves the
/// draw above the final cumulative sum, the last class with a positive
/// rate is returned. Returns `None` only when every rate is zero.
pub fn choose_class(rates: &RateVector, draw: f64) -> Option<EventClass> {
    let total = rates.total();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let target = draw * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for class in EventClass::ALL {
        let rate = rates.get(class);
        if rate <= 0.0 {
            continue;
        }
        cumulative += rate;
        last_positive = Some(class);
        if target <= cumulative {
            return Some(class);
        }
    }

    if let Some(class) = last_positive {
        warn!(draw, total, %class, "Cumulative scan fell through; using last positive class");
    }
    last_positive
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use cyclic_lattice::Lattice;
    use cyclic_types::Site;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::params::RateConstants;

    fn rates(competition: f64, pair_exchange: f64, reproduction: f64, hopping: f64) -> RateVector {
        RateVector {
            competition,
            pair_exchange,
            reproduction,
            hopping,
        }
    }

    #[test]
    fn zero_total_rate_selects_nothing() {
        assert_eq!(choose_class(&RateVector::default(), 0.5), None);
        let catalog = EventCatalog::default();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(select(&catalog, &mut rng).is_none());
    }

    #[test]
    fn cumulative_scan_picks_first_class_meeting_the_draw() {
        let r = rates(1.0, 1.0, 1.0, 1.0);
        assert_eq!(choose_class(&r, 0.1), Some(EventClass::Competition));
        assert_eq!(choose_class(&r, 0.25), Some(EventClass::Competition));
        assert_eq!(choose_class(&r, 0.26), Some(EventClass::PairExchange));
        assert_eq!(choose_class(&r, 0.74), Some(EventClass::Reproduction));
        assert_eq!(choose_class(&r, 1.0), Some(EventClass::Hopping));
    }

    #[test]
    fn zero_rate_classes_are_never_chosen() {
        let r = rates(0.0, 0.0, 2.0, 0.0);
        for draw in [1e-12, 0.3, 0.999, 1.0] {
            assert_eq!(choose_class(&r, draw), Some(EventClass::Reproduction));
        }
        let trailing_zero = rates(1.0, 0.0, 0.0, 0.0);
        assert_eq!(choose_class(&trailing_zero, 1.0), Some(EventClass::Competition));
    }

    #[test]
    fn overshooting_draw_falls_back_to_last_positive_class() {
        let r = rates(1.0, 1.0, 0.0, 0.0);
        assert_eq!(choose_class(&r, 1.5), Some(EventClass::PairExchange));
    }

    #[test]
    fn selected_event_belongs_to_the_catalog() {
        let lattice = Lattice::from_codes(&[vec![1, 0, 0], vec![0, 2, 0], vec![0, 0, 0]]).unwrap();
        let catalog = EventCatalog::build(&lattice, &RateConstants::default());
        let mut rng = SmallRng::seed_from_u64(17);

        for _ in 0..200 {
            let selection = select(&catalog, &mut rng).unwrap();
            assert!(selection.tau >= 0.0);
            assert!((selection.total_rate - catalog.total_rate()).abs() < 1e-9);
            let pairs = catalog.pairs(selection.event.class);
            assert!(pairs.iter().any(|pair| {
                pair.source == selection.event.source && pair.target == selection.event.target
            }));
        }
    }

    #[test]
    fn class_frequencies_track_rates() {
        // Lone A on a 3x3 torus: reproduction 8 * mu, hopping 8 * D.
        let lattice = Lattice::from_codes(&[vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
        let constants = RateConstants {
            sigma: 1.0,
            mu: 1.0,
            epsilon: 1.0,
            hopping: 3.0,
        };
        let catalog = EventCatalog::build(&lattice, &constants);
        let mut rng = SmallRng::seed_from_u64(99);

        let trials = 20_000_u32;
        let mut hops = 0_u32;
        for _ in 0..trials {
            let selection = select(&catalog, &mut rng).unwrap();
            assert_eq!(selection.event.source, Site::new(1, 1));
            if selection.event.class == EventClass::Hopping {
                hops += 1;
            }
        }
        let share = f64::from(hops) / f64::from(trials);
        assert!((share - 0.75).abs() < 0.02, "hopping share {share}");
    }

    #[test]
    fn mean_waiting_time_is_inverse_total_rate() {
        let lattice = Lattice::from_codes(&[vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
        let catalog = EventCatalog::build(&lattice, &RateConstants::default());
        let mut rng = SmallRng::seed_from_u64(5);

        let samples = 20_000_u32;
        let mut sum = 0.0;
        for _ in 0..samples {
            sum += select(&catalog, &mut rng).unwrap().tau;
        }
        let mean = sum / f64::from(samples);
        let expected = 1.0 / catalog.total_rate();
        assert!((mean - expected).abs() < expected * 0.05, "mean {mean}");
    }
}
