//! Step observers: hooks the driver calls between completed steps.
//!
//! Observers see every step record and a read-only view of the lattice.
//! Returning [`ControlFlow::Break`] stops the run cleanly after the current
//! step, which is the only way an external caller can interrupt a run.

use std::ops::ControlFlow;

use cyclic_lattice::Lattice;
use cyclic_types::{Census, Event};
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Everything that happened in one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based index of this step.
    pub step: u64,
    /// The event that fired.
    pub event: Event,
    /// Waiting time before the event.
    pub tau: f64,
    /// Model time after the event.
    pub time: f64,
    /// Per-capita time after the event.
    pub per_capita_time: f64,
    /// Total rate of the catalog the event was drawn from.
    pub total_rate: f64,
    /// Population counts after the event.
    pub census: Census,
}

/// Callback invoked by the driver around each step.
pub trait StepObserver {
    /// Called once with the initial lattice before the first step.
    fn on_start(&mut self, _lattice: &Lattice) {}

    /// Called after a step completes. Return `Break` to stop the run.
    fn on_step(&mut self, record: &StepRecord, lattice: &Lattice) -> ControlFlow<()>;
}

/// An observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _record: &StepRecord, _lattice: &Lattice) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A stored copy of the lattice at one point of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Steps executed when the snapshot was taken (0 = initial lattice).
    pub step: u64,
    /// Model time at the snapshot.
    pub time: f64,
    /// Lattice codes, one row per lattice row.
    pub codes: Vec<Vec<u8>>,
}

/// Records the lattice every `interval` steps, plus the initial state.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    interval: u64,
    snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    /// Record every `interval` steps.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::ZeroSnapshotInterval`] if `interval` is 0.
    pub fn new(interval: u64) -> Result<Self, ParameterError> {
        if interval == 0 {
            return Err(ParameterError::ZeroSnapshotInterval);
        }
        Ok(Self {
            interval,
            snapshots: Vec::new(),
        })
    }

    /// Spread roughly `count` snapshots evenly over a run of `total_steps`.
    ///
    /// Returns `None` when `count` is 0.
    pub fn spread(total_steps: u64, count: u64) -> Option<Self> {
        let interval = total_steps.checked_div(count)?.max(1);
        Self::new(interval).ok()
    }

    /// The configured interval.
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Snapshots taken so far, in step order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Consume the recorder, returning its snapshots.
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

impl StepObserver for SnapshotRecorder {
    fn on_start(&mut self, lattice: &Lattice) {
        self.snapshots.push(Snapshot {
            step: 0,
            time: 0.0,
            codes: lattice.codes(),
        });
    }

    fn on_step(&mut self, record: &StepRecord, lattice: &Lattice) -> ControlFlow<()> {
        if record.step.checked_rem(self.interval) == Some(0) {
            self.snapshots.push(Snapshot {
                step: record.step,
                time: record.time,
                codes: lattice.codes(),
            });
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cyclic_types::{EventClass, Site};

    use super::*;

    fn record(step: u64) -> StepRecord {
        StepRecord {
            step,
            event: Event {
                class: EventClass::Hopping,
                source: Site::new(0, 0),
                target: Site::new(0, 1),
            },
            tau: 0.1,
            time: 0.1,
            per_capita_time: 0.01,
            total_rate: 10.0,
            census: Census::default(),
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(
            SnapshotRecorder::new(0).err(),
            Some(ParameterError::ZeroSnapshotInterval)
        );
    }

    #[test]
    fn spread_divides_run_evenly() {
        assert_eq!(SnapshotRecorder::spread(1000, 10).unwrap().interval(), 100);
        assert_eq!(SnapshotRecorder::spread(5, 300).unwrap().interval(), 1);
        assert!(SnapshotRecorder::spread(1000, 0).is_none());
    }

    #[test]
    fn recorder_captures_initial_state_and_every_interval() {
        let lattice = Lattice::empty(2).unwrap();
        let mut recorder = SnapshotRecorder::new(3).unwrap();
        recorder.on_start(&lattice);
        for step in 1..=10 {
            assert!(recorder.on_step(&record(step), &lattice).is_continue());
        }
        let steps: Vec<u64> = recorder.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 3, 6, 9]);
        assert_eq!(
            recorder.into_snapshots().first().map(|s| s.codes.clone()),
            Some(vec![vec![0, 0], vec![0, 0]])
        );
    }
}
