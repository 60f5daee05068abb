//! Step observer used by the engine: progress logging plus optional
//! snapshot recording.

use std::ops::ControlFlow;

use cyclic_core::{Snapshot, SnapshotRecorder, StepObserver, StepRecord};
use cyclic_lattice::Lattice;
use tracing::info;

/// Number of progress lines logged over a full run.
const PROGRESS_REPORTS: u64 = 10;

/// Observer that reports progress and forwards to a snapshot recorder.
#[derive(Debug)]
pub struct EngineObserver {
    report_every: u64,
    total_steps: u64,
    recorder: Option<SnapshotRecorder>,
}

impl EngineObserver {
    /// Observe a run of `total_steps`, recording snapshots if `recorder`
    /// is given.
    pub fn new(total_steps: u64, recorder: Option<SnapshotRecorder>) -> Self {
        Self {
            report_every: (total_steps / PROGRESS_REPORTS).max(1),
            total_steps,
            recorder,
        }
    }

    /// Snapshots recorded so far, empty when recording is disabled.
    pub fn snapshots(&self) -> &[Snapshot] {
        self.recorder
            .as_ref()
            .map(SnapshotRecorder::snapshots)
            .unwrap_or_default()
    }
}

impl StepObserver for EngineObserver {
    fn on_start(&mut self, lattice: &Lattice) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_start(lattice);
        }
    }

    fn on_step(&mut self, record: &StepRecord, lattice: &Lattice) -> ControlFlow<()> {
        if record.step.checked_rem(self.report_every) == Some(0) {
            info!(
                step = record.step,
                total_steps = self.total_steps,
                time = record.time,
                per_capita_time = record.per_capita_time,
                a = record.census.a,
                b = record.census.b,
                c = record.census.c,
                empty = record.census.empty,
                "Progress"
            );
        }
        match self.recorder.as_mut() {
            Some(recorder) => recorder.on_step(record, lattice),
            None => ControlFlow::Continue(()),
        }
    }
}
