//! What-if comparison of crew configurations against one baseline.

use crate::calculations::Baseline;
use crate::leveling::{LeveledSchedule, LevelingOptions, level_resources};
use crate::metrics::{ProjectMetrics, compute_metrics};
use crate::task::Task;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    #[serde(flatten)]
    pub leveling: LevelingOptions,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
}

fn default_hours_per_day() -> f64 {
    8.0
}

impl Scenario {
    pub fn new(label: impl Into<String>, leveling: LevelingOptions) -> Self {
        Self {
            label: label.into(),
            leveling,
            hours_per_day: default_hours_per_day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub metrics: ProjectMetrics,
    pub schedule: LeveledSchedule,
}

/// Levels every scenario independently, in parallel. Outcomes come back in
/// the order the scenarios were given.
pub fn evaluate_scenarios(tasks: &[Task], baseline: &Baseline, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
    scenarios
        .par_iter()
        .map(|scenario| {
            let schedule = level_resources(tasks, baseline, &scenario.leveling);
            let metrics = compute_metrics(&schedule, scenario.hours_per_day);
            ScenarioOutcome {
                label: scenario.label.clone(),
                metrics,
                schedule,
            }
        })
        .collect()
}

/// The scenario with the fewest working days; ties keep the earlier one.
pub fn fastest(outcomes: &[ScenarioOutcome]) -> Option<&ScenarioOutcome> {
    outcomes.iter().reduce(|best, candidate| {
        if candidate.metrics.duration_days < best.metrics.duration_days {
            candidate
        } else {
            best
        }
    })
}
