use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

pub const DEFAULT_WEEKLY_CAPACITY_HOURS: f64 = 40.0;
const MAX_HOURS_PRECISION: u32 = 6;

/// What graph assembly does with a dependency naming a task that is not on
/// the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Drop the edge and record it on the schedule.
    #[default]
    Skip,
    /// Fail with `ScheduleError::DanglingDependency`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity assumed for an assignee without a capacity row.
    pub default_weekly_capacity_hours: f64,
    pub dangling_dependencies: DanglingPolicy,
    /// Anchor used when no task on the board has an explicit start date.
    /// When unset the local calendar date is used.
    pub fallback_anchor_date: Option<NaiveDate>,
    /// Decimal places kept for hours and utilization in workload payloads.
    pub hours_precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_weekly_capacity_hours: DEFAULT_WEEKLY_CAPACITY_HOURS,
            dangling_dependencies: DanglingPolicy::Skip,
            fallback_anchor_date: None,
            hours_precision: 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl EngineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.default_weekly_capacity_hours;
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_weekly_capacity_hours must be a non-negative number (got {capacity})"
            )));
        }
        if self.hours_precision > MAX_HOURS_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "hours_precision must be at most {MAX_HOURS_PRECISION} (got {})",
                self.hours_precision
            )));
        }
        Ok(())
    }

    /// The configured fallback anchor, or today's local date.
    pub fn fallback_anchor(&self) -> NaiveDate {
        self.fallback_anchor_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn with_fallback_anchor(mut self, date: NaiveDate) -> Self {
        self.fallback_anchor_date = Some(date);
        self
    }

    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling_dependencies = policy;
        self
    }
}
