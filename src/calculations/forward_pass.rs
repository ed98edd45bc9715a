use crate::graph::TopoOrder;
use crate::task::{Task, TaskId};
use std::collections::HashMap;
use tracing::debug;

pub struct ForwardPass<'a> {
    tasks: &'a [Task],
    order: &'a TopoOrder,
}

impl<'a> ForwardPass<'a> {
    pub fn new(tasks: &'a [Task], order: &'a TopoOrder) -> Self {
        Self { tasks, order }
    }

    /// Early start/finish per task, in hours from project hour zero.
    pub fn execute(&self) -> HashMap<TaskId, (f64, f64)> {
        let by_id: HashMap<&TaskId, &Task> = self.tasks.iter().map(|t| (&t.id, t)).collect();
        let mut early: HashMap<TaskId, (f64, f64)> = HashMap::with_capacity(self.tasks.len());

        for task_id in self.order.full_order() {
            let Some(task) = by_id.get(task_id) else {
                continue;
            };

            let mut early_start = 0.0_f64;
            for dep in &task.dependencies {
                match early.get(dep) {
                    Some(&(_, dep_finish)) => early_start = early_start.max(dep_finish),
                    // Dangling, or still waiting on a cycle.
                    None => debug!(task = %task_id, dependency = %dep, "dependency has no early finish yet"),
                }
            }

            let early_finish = early_start + task.effective_duration();
            early.insert(task_id.clone(), (early_start, early_finish));
        }

        early
    }
}
