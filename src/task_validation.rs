use crate::error::{ScheduleError, ScheduleResult};
use crate::task::{Task, TaskId};
use std::collections::HashSet;
use tracing::warn;

/// Non-fatal findings from [`validate_tasks`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// `(task, missing dependency)` pairs referencing ids outside the list.
    pub dangling: Vec<(TaskId, TaskId)>,
}

impl ValidationReport {
    pub fn warnings(&self) -> Vec<String> {
        self.dangling
            .iter()
            .map(|(task, dep)| format!("task {task} depends on {dep}, which is not in the task list"))
            .collect()
    }
}

pub fn validate_task(task: &Task) -> ScheduleResult<()> {
    if task.id.as_str().trim().is_empty() {
        return Err(ScheduleError::InvalidTask {
            id: task.id.to_string(),
            reason: format!("task '{}' has an empty id", task.name),
        });
    }

    if let Some(hours) = task.duration_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(ScheduleError::InvalidTask {
                id: task.id.to_string(),
                reason: format!("duration_hours must be a non-negative number (got {hours})"),
            });
        }
    }

    if task.depends_on(&task.id) {
        return Err(ScheduleError::SelfDependency(task.id.clone()));
    }

    Ok(())
}

/// Checks the invariants the scheduling passes rely on.
pub fn validate_tasks(tasks: &[Task]) -> ScheduleResult<ValidationReport> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        validate_task(task)?;
        if !seen_ids.insert(&task.id) {
            return Err(ScheduleError::DuplicateTaskId(task.id.clone()));
        }
    }

    let mut report = ValidationReport::default();
    for task in tasks {
        for dep in &task.dependencies {
            if !seen_ids.contains(dep) {
                warn!(task = %task.id, dependency = %dep, "dependency outside task list");
                report.dangling.push((task.id.clone(), dep.clone()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_ids() {
        let tasks = vec![Task::new("A", "a", Some(1.0)), Task::new("A", "b", Some(1.0))];
        let err = validate_tasks(&tasks).unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateTaskId(id) if id.as_str() == "A"));
    }

    #[test]
    fn rejects_negative_duration() {
        let tasks = vec![Task::new("A", "a", Some(-2.0))];
        assert!(matches!(
            validate_tasks(&tasks),
            Err(ScheduleError::InvalidTask { .. })
        ));
    }

    #[test]
    fn rejects_self_dependency() {
        let tasks = vec![Task::new("A", "a", Some(1.0)).with_dependencies(["A"])];
        assert!(matches!(
            validate_tasks(&tasks),
            Err(ScheduleError::SelfDependency(_))
        ));
    }

    #[test]
    fn reports_dangling_dependencies_without_failing() {
        let tasks = vec![Task::new("B", "b", Some(1.0)).with_dependencies(["Z"])];
        let report = validate_tasks(&tasks).unwrap();
        assert_eq!(report.dangling, vec![(TaskId::from("B"), TaskId::from("Z"))]);
        assert_eq!(report.warnings().len(), 1);
    }
}
