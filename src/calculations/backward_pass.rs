use crate::graph::{DependencyGraph, TopoOrder};
use crate::task::{Task, TaskId};
use std::collections::HashMap;

pub struct BackwardPass<'a> {
    tasks: &'a [Task],
    graph: &'a DependencyGraph,
    order: &'a TopoOrder,
}

impl<'a> BackwardPass<'a> {
    pub fn new(tasks: &'a [Task], graph: &'a DependencyGraph, order: &'a TopoOrder) -> Self {
        Self { tasks, graph, order }
    }

    /// Late start/finish per task, walking the order back from `project_finish`.
    pub fn execute(&self, project_finish: f64) -> HashMap<TaskId, (f64, f64)> {
        let durations: HashMap<&TaskId, f64> = self
            .tasks
            .iter()
            .map(|t| (&t.id, t.effective_duration()))
            .collect();

        let mut late: HashMap<TaskId, (f64, f64)> = HashMap::with_capacity(self.tasks.len());
        let order: Vec<&TaskId> = self.order.full_order().collect();

        for task_id in order.into_iter().rev() {
            // Only successors already visited constrain the late finish.
            let late_finish = self
                .graph
                .successors(task_id)
                .into_iter()
                .filter_map(|succ| late.get(succ).map(|&(ls, _)| ls))
                .reduce(f64::min)
                .unwrap_or(project_finish);

            let duration = durations.get(task_id).copied().unwrap_or(0.0);
            late.insert(task_id.clone(), (late_finish - duration, late_finish));
        }

        late
    }
}
