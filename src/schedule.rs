use crate::calculations::{Baseline, compute_baseline};
use crate::config::{CyclePolicy, SchedulerConfig};
use crate::error::{ScheduleError, ScheduleResult};
use crate::ingest::filter_sections;
use crate::leveling::{LeveledSchedule, level_resources};
use crate::metrics::{ProjectMetrics, TargetCheck, compute_metrics};
use crate::task::{Task, TaskId};
use crate::task_validation::validate_tasks;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

/// Everything one scheduling request produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub baseline: Baseline,
    pub schedule: LeveledSchedule,
    pub metrics: ProjectMetrics,
    /// Tasks scheduled as milestones because their duration is unknown.
    pub missing_durations: Vec<TaskId>,
    pub unresolved: Vec<TaskId>,
    pub cycles: Vec<Vec<TaskId>>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetCheck>,
}

impl ScheduleReport {
    pub fn task_count(&self) -> usize {
        self.schedule.len()
    }

    pub fn critical_path(&self) -> Vec<TaskId> {
        self.baseline.critical_path()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count()));
        parts.push(format!("critical={}", self.critical_path().len()));
        parts.push(format!("finish={:.1}h", self.metrics.finish_hours));
        parts.push(format!("days={:.1}", self.metrics.duration_days));
        if !self.missing_durations.is_empty() {
            parts.push(format!("missing_duration={}", self.missing_durations.len()));
        }
        if !self.unresolved.is_empty() {
            parts.push(format!("unresolved={}", self.unresolved.len()));
        }
        if let Some(target) = &self.target {
            if target.exceeded {
                parts.push(format!("over_target={}d", target.target_days));
            }
        }
        parts.join(", ")
    }
}

/// Tasks selected for scheduling and their CPM baseline, with the warnings
/// raised while getting there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedBaseline {
    pub tasks: Vec<Task>,
    pub baseline: Baseline,
    pub warnings: Vec<String>,
}

/// Validate, filter by section and baseline `tasks`, applying the configured
/// cycle policy.
pub fn prepare_baseline(tasks: &[Task], config: &SchedulerConfig) -> ScheduleResult<PreparedBaseline> {
    let validation = validate_tasks(tasks)?;
    let mut warnings = validation.warnings();

    let selected = filter_sections(tasks, &config.sections);
    warnings.extend(filtered_out_dependencies(tasks, &selected));
    let baseline = compute_baseline(&selected);

    if !baseline.unresolved.is_empty() {
        if config.cycle_policy == CyclePolicy::Reject {
            return Err(ScheduleError::CycleDetected {
                tasks: baseline.unresolved.clone(),
            });
        }
        warnings.push(format!(
            "{} task(s) could not be ordered because of dependency cycles; their timings are best-effort",
            baseline.unresolved.len()
        ));
    }

    Ok(PreparedBaseline {
        tasks: selected,
        baseline,
        warnings,
    })
}

/// Dependencies that exist in the full list but were left out by the section
/// filter. They no longer constrain their dependents.
fn filtered_out_dependencies(all: &[Task], selected: &[Task]) -> Vec<String> {
    if all.len() == selected.len() {
        return Vec::new();
    }
    let known: HashSet<&TaskId> = all.iter().map(|t| &t.id).collect();
    let kept: HashSet<&TaskId> = selected.iter().map(|t| &t.id).collect();

    let mut warnings = Vec::new();
    for task in selected {
        for dep in &task.dependencies {
            if known.contains(dep) && !kept.contains(dep) {
                warn!(task = %task.id, dependency = %dep, "dependency outside selected sections");
                warnings.push(format!(
                    "task {} depends on {dep}, which is outside the selected sections and is ignored",
                    task.id
                ));
            }
        }
    }
    warnings
}

/// Validate, baseline, level and measure `tasks` under `config`.
///
/// Nothing is cached between calls; identical inputs give identical reports.
pub fn plan_schedule(tasks: &[Task], config: &SchedulerConfig) -> ScheduleResult<ScheduleReport> {
    let PreparedBaseline {
        tasks: selected,
        baseline,
        mut warnings,
    } = prepare_baseline(tasks, config)?;

    let schedule = level_resources(&selected, &baseline, &config.leveling_options());
    let metrics = compute_metrics(&schedule, config.hours_per_day);
    let missing_durations = schedule.missing_durations();
    if !missing_durations.is_empty() {
        warnings.push(format!(
            "{} task(s) have no duration and were scheduled as milestones",
            missing_durations.len()
        ));
    }

    let target = config
        .target_days
        .map(|days| TargetCheck::evaluate(&metrics, days));
    if let Some(advice) = target.as_ref().and_then(TargetCheck::advice) {
        warn!("{advice}");
        warnings.push(advice);
    }

    info!(
        tasks = schedule.len(),
        finish_hours = metrics.finish_hours,
        duration_days = metrics.duration_days,
        "schedule computed"
    );

    Ok(ScheduleReport {
        unresolved: baseline.unresolved.clone(),
        cycles: baseline.cycles.clone(),
        baseline,
        schedule,
        metrics,
        missing_durations,
        warnings,
        target,
    })
}
