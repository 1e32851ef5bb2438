//! Run progress listeners.

use crate::status::{SimulationStage, StageOutcome};
use crate::time::TimeIndex;

/// Receives engine progress notifications during a run.
///
/// All hooks default to no-ops, so a listener only implements what it
/// cares about.
pub trait RunListener {
    fn on_stage_started(&mut self, _stage: SimulationStage) {}

    fn on_stage_completed(&mut self, _stage: SimulationStage, _outcome: StageOutcome) {}

    fn on_step_completed(&mut self, _index: TimeIndex) {}
}

/// Listener that ignores every notification.
#[derive(Debug, Default)]
pub struct NoopListener;

impl RunListener for NoopListener {}
