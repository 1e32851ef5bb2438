//! Simulation staging and timing status.

use crate::errors::{CatenaError, CatenaResult};
use crate::time::TimeIndex;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle stage a simulation is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationStage {
    Pre,
    InitParams,
    PrepareData,
    CheckConsistency,
    InitializeRun,
    RunStep,
    FinalizeRun,
    Post,
}

impl fmt::Display for SimulationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationStage::Pre => "PRE",
            SimulationStage::InitParams => "INITPARAMS",
            SimulationStage::PrepareData => "PREPAREDATA",
            SimulationStage::CheckConsistency => "CHECKCONSISTENCY",
            SimulationStage::InitializeRun => "INITIALIZERUN",
            SimulationStage::RunStep => "RUNSTEP",
            SimulationStage::FinalizeRun => "FINALIZERUN",
            SimulationStage::Post => "POST",
        };
        write!(f, "{name}")
    }
}

/// How a completed stage went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageOutcome::Ok => "OK",
            StageOutcome::Warning => "WARNING",
            StageOutcome::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

/// Policy applied to the scheduling requests simulators return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingConstraint {
    /// Requests are honoured as returned.
    #[default]
    None,
    /// Any request other than the default delta-t is rejected as an error.
    DtChecked,
    /// Any request other than `Never` is coerced to the default delta-t.
    DtForced,
}

/// Timing of a run: period, step length and the engine's progress through it.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStatus {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    delta_t: u64,
    constraint: SchedulingConstraint,
    #[serde(skip)]
    stage: SimulationStage,
    current_index: TimeIndex,
}

impl SimulationStatus {
    pub fn new(
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        delta_t: u64,
        constraint: SchedulingConstraint,
    ) -> CatenaResult<Self> {
        if end <= begin {
            return Err(CatenaError::Config {
                message: format!("end date {end} is not after begin date {begin}"),
            });
        }
        if delta_t == 0 {
            return Err(CatenaError::Config {
                message: "delta-t must be at least 1 second".to_string(),
            });
        }
        Ok(SimulationStatus {
            begin,
            end,
            delta_t,
            constraint,
            stage: SimulationStage::Pre,
            current_index: TimeIndex::ZERO,
        })
    }

    pub fn begin_date(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn default_delta_t(&self) -> u64 {
        self.delta_t
    }

    pub fn constraint(&self) -> SchedulingConstraint {
        self.constraint
    }

    pub fn stage(&self) -> SimulationStage {
        self.stage
    }

    pub fn current_index(&self) -> TimeIndex {
        self.current_index
    }

    pub fn current_date(&self) -> DateTime<Utc> {
        self.date_of(self.current_index)
    }

    /// Seconds from begin to end, i.e. the largest valid time index.
    pub fn end_index(&self) -> TimeIndex {
        TimeIndex::new((self.end - self.begin).num_seconds() as u64)
    }

    pub fn date_of(&self, index: TimeIndex) -> DateTime<Utc> {
        self.begin + Duration::seconds(index.seconds() as i64)
    }

    pub(crate) fn set_stage(&mut self, stage: SimulationStage) {
        self.stage = stage;
    }

    pub(crate) fn set_current_index(&mut self, index: TimeIndex) {
        self.current_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn status() -> SimulationStatus {
        SimulationStatus::new(
            Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2001, 1, 1, 10, 0, 0).unwrap(),
            3600,
            SchedulingConstraint::None,
        )
        .unwrap()
    }

    #[test]
    fn indices_and_dates() {
        let status = status();
        assert_eq!(status.end_index(), TimeIndex::new(36000));
        assert_eq!(
            status.date_of(TimeIndex::new(7200)),
            Utc.with_ymd_and_hms(2001, 1, 1, 2, 0, 0).unwrap()
        );
        assert_eq!(status.current_index(), TimeIndex::ZERO);
        assert_eq!(status.stage(), SimulationStage::Pre);
    }

    #[test]
    fn rejects_bad_periods() {
        let begin = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let err = SimulationStatus::new(begin, begin, 60, SchedulingConstraint::None);
        assert!(matches!(err, Err(CatenaError::Config { .. })));
        let err = SimulationStatus::new(
            begin,
            begin + Duration::hours(1),
            0,
            SchedulingConstraint::None,
        );
        assert!(matches!(err, Err(CatenaError::Config { .. })));
    }

    #[test]
    fn stage_names() {
        assert_eq!(SimulationStage::CheckConsistency.to_string(), "CHECKCONSISTENCY");
        assert_eq!(SimulationStage::RunStep.to_string(), "RUNSTEP");
        assert_eq!(StageOutcome::Warning.to_string(), "WARNING");
    }
}
