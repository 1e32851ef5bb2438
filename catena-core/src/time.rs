//! Discrete simulation time.
//!
//! A run covers a real time period, but the engine and the stores only deal
//! in [`TimeIndex`] values: whole-second offsets from the period's begin
//! timestamp. Index 0 is the initialization point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A point in simulation time, in seconds since the begin of the period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TimeIndex(u64);

impl TimeIndex {
    pub const ZERO: TimeIndex = TimeIndex(0);

    pub fn new(seconds: u64) -> Self {
        TimeIndex(seconds)
    }

    pub fn seconds(self) -> u64 {
        self.0
    }
}

impl Add<u64> for TimeIndex {
    type Output = TimeIndex;

    fn add(self, seconds: u64) -> TimeIndex {
        TimeIndex(self.0 + seconds)
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a simulator wants the delay until its next step to be.
///
/// Returned by `initialize_run` (for the first step) and by every
/// `run_step` (for the following one). The model instance resolves the
/// request against the simulation status; see the scheduling rules there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingRequest {
    /// Step again after the default delta-T.
    DefaultDeltaT,
    /// Step again after this many seconds (must be non-zero).
    Duration(u64),
    /// Step exactly once more, at the end of the period.
    AtTheEnd,
    /// Never step again.
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_arithmetic() {
        let t = TimeIndex::new(3600);
        assert_eq!(t + 3600, TimeIndex::new(7200));
        assert_eq!(t.seconds(), 3600);
        assert!(TimeIndex::ZERO < t);
    }

    #[test]
    fn display() {
        assert_eq!(TimeIndex::new(120).to_string(), "120");
    }
}
