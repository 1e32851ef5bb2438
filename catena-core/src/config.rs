//! TOML run configuration.
//!
//! A run can be described in a small TOML file instead of being assembled
//! in code:
//!
//! ```toml
//! [period]
//! begin = "2001-01-01T00:00:00Z"
//! end = "2001-01-01T10:00:00Z"
//! delta_t = 3600
//! constraint = "dt-checked"
//!
//! [paths]
//! input_dir = "/data/in"
//! output_dir = "/data/out"
//! clear_output_dir = true
//! ```

use crate::errors::CatenaResult;
use crate::runenv::RunEnvironment;
use crate::status::{SchedulingConstraint, SimulationStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodConfig {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub delta_t: u64,
    #[serde(default)]
    pub constraint: SchedulingConstraint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub clear_output_dir: bool,
}

/// Deserialized run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub period: PeriodConfig,
    pub paths: PathsConfig,
}

impl RunConfig {
    pub fn from_toml_str(raw: &str) -> CatenaResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> CatenaResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn status(&self) -> CatenaResult<SimulationStatus> {
        SimulationStatus::new(
            self.period.begin,
            self.period.end,
            self.period.delta_t,
            self.period.constraint,
        )
    }

    pub fn run_environment(&self) -> RunEnvironment {
        RunEnvironment::new(&self.paths.input_dir, &self.paths.output_dir)
            .with_clear_output_dir(self.paths.clear_output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatenaError;
    use crate::time::TimeIndex;
    use chrono::TimeZone;

    const CONFIG: &str = r#"
        [period]
        begin = "2001-01-01T00:00:00Z"
        end = "2001-01-01T10:00:00Z"
        delta_t = 3600
        constraint = "dt-forced"

        [paths]
        input_dir = "/data/in"
        output_dir = "/data/out"
        clear_output_dir = true
    "#;

    #[test]
    fn parses_full_config() {
        let config = RunConfig::from_toml_str(CONFIG).unwrap();
        let status = config.status().unwrap();
        assert_eq!(
            status.begin_date(),
            Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(status.default_delta_t(), 3600);
        assert_eq!(status.constraint(), SchedulingConstraint::DtForced);
        assert_eq!(status.end_index(), TimeIndex::new(36000));

        let env = config.run_environment();
        assert_eq!(env.output_dir(), Path::new("/data/out"));
        assert!(env.clear_output_dir());
    }

    #[test]
    fn constraint_defaults_to_none() {
        let raw = r#"
            [period]
            begin = "2001-01-01T00:00:00Z"
            end = "2001-01-02T00:00:00Z"
            delta_t = 60

            [paths]
            input_dir = "in"
            output_dir = "out"
        "#;
        let config = RunConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.period.constraint, SchedulingConstraint::None);
        assert!(!config.paths.clear_output_dir);
    }

    #[test]
    fn reports_parse_errors() {
        let err = RunConfig::from_toml_str("[period]\nbegin = 12");
        assert!(matches!(err, Err(CatenaError::ConfigParse(_))));
    }
}
