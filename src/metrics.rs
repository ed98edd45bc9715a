use crate::leveling::LeveledSchedule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub duration_days: f64,
    pub finish_hours: f64,
}

/// Project duration in working days. The divisor is floored at one hour.
pub fn compute_metrics(schedule: &LeveledSchedule, hours_per_day: f64) -> ProjectMetrics {
    if schedule.is_empty() {
        return ProjectMetrics::default();
    }
    let finish_hours = schedule.finish();
    ProjectMetrics {
        duration_days: finish_hours / hours_per_day.max(1.0),
        finish_hours,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCheck {
    pub target_days: f64,
    pub duration_days: f64,
    pub exceeded: bool,
}

impl TargetCheck {
    pub fn evaluate(metrics: &ProjectMetrics, target_days: f64) -> Self {
        Self {
            target_days,
            duration_days: metrics.duration_days,
            exceeded: metrics.duration_days > target_days,
        }
    }

    pub fn advice(&self) -> Option<String> {
        self.exceeded.then(|| {
            format!(
                "Schedule exceeds target ({:.1} d > {} d). Consider adding crews (increase capacities), \
                 pooling by category, or overlapping work.",
                self.duration_days, self.target_days
            )
        })
    }
}
