use crate::calendar::WorkClock;
use crate::error::{ConfigError, ConfigResult};
use crate::leveling::LevelingOptions;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// What to do when the dependency graph has a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Schedule anyway; unresolved tasks are listed in the report.
    #[default]
    Degrade,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub hours_per_day: f64,
    /// Calendar day that project hour zero falls on.
    pub anchor_date: NaiveDate,
    pub workday_start: NaiveTime,
    pub pool_by_category: bool,
    pub capacity_by_category: BTreeMap<String, u32>,
    /// Chain tasks within a section/subsection by planned day at ingestion.
    pub auto_chain: bool,
    /// Sections to schedule; empty schedules everything.
    pub sections: Vec<String>,
    pub target_days: Option<f64>,
    pub cycle_policy: CyclePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            anchor_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            workday_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            pool_by_category: false,
            capacity_by_category: BTreeMap::new(),
            auto_chain: true,
            sections: Vec::new(),
            target_days: None,
            cycle_policy: CyclePolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hours_per_day must be a positive number (got {})",
                self.hours_per_day
            )));
        }
        if let Some(target) = self.target_days {
            if !target.is_finite() || target <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "target_days must be a positive number (got {target})"
                )));
            }
        }
        Ok(())
    }

    pub fn leveling_options(&self) -> LevelingOptions {
        LevelingOptions {
            pool_by_category: self.pool_by_category,
            capacity_by_category: self.capacity_by_category.clone(),
        }
    }

    pub fn work_clock(&self) -> WorkClock {
        WorkClock::new(self.anchor_date, self.hours_per_day, self.workday_start)
    }

    pub fn set_capacity(&mut self, category: impl Into<String>, crews: u32) {
        self.capacity_by_category.insert(category.into(), crews.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"pool_by_category": true}"#).unwrap();
        assert!(config.pool_by_category);
        assert_eq!(config.hours_per_day, 8.0);
        assert_eq!(config.cycle_policy, CyclePolicy::Degrade);
    }

    #[test]
    fn rejects_non_positive_hours_per_day() {
        let config = SchedulerConfig {
            hours_per_day: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn capacity_is_clamped_when_set() {
        let mut config = SchedulerConfig::default();
        config.set_capacity("2", 0);
        assert_eq!(config.capacity_by_category.get("2"), Some(&1));
    }
}
