//! Unresourced critical-path baseline.
//!
//! The forward pass walks the topological order computing early start/finish;
//! the backward pass walks it in reverse from the project finish computing
//! late start/finish. Crew limits are ignored here; see [`crate::leveling`].

pub mod backward_pass;
pub mod forward_pass;

use crate::graph::DependencyGraph;
use crate::task::{Task, TaskId};
use backward_pass::BackwardPass;
use forward_pass::ForwardPass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const FLOAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpmInfo {
    pub duration: f64,
    pub es: f64,
    pub ef: f64,
    pub ls: f64,
    pub lf: f64,
}

impl CpmInfo {
    pub fn total_float(&self) -> f64 {
        self.ls - self.es
    }

    pub fn is_critical(&self) -> bool {
        self.total_float().abs() <= FLOAT_EPSILON
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub entries: BTreeMap<TaskId, CpmInfo>,
    pub project_finish: f64,
    /// Order the passes ran in (resolved tasks only).
    pub order: Vec<TaskId>,
    /// Tasks a dependency cycle kept out of `order`. Their timings are
    /// best-effort and should not be trusted.
    pub unresolved: Vec<TaskId>,
    pub cycles: Vec<Vec<TaskId>>,
}

impl Baseline {
    pub fn get(&self, id: &TaskId) -> Option<&CpmInfo> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_trustworthy(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Zero-float tasks ordered by early start.
    pub fn critical_path(&self) -> Vec<TaskId> {
        let mut critical: Vec<(&TaskId, &CpmInfo)> = self
            .entries
            .iter()
            .filter(|(_, info)| info.is_critical())
            .collect();
        critical.sort_by(|(a_id, a), (b_id, b)| a.es.total_cmp(&b.es).then_with(|| a_id.cmp(b_id)));
        critical.into_iter().map(|(id, _)| id.clone()).collect()
    }
}

/// CPM baseline for `tasks`, recomputed from scratch on every call.
pub fn compute_baseline(tasks: &[Task]) -> Baseline {
    if tasks.is_empty() {
        return Baseline::default();
    }

    let graph = DependencyGraph::build(tasks);
    let topo = graph.topological_order();
    let cycles = if topo.is_complete() {
        Vec::new()
    } else {
        let cycles = graph.cycles();
        warn!(
            unresolved = topo.unresolved.len(),
            cycles = cycles.len(),
            "dependency cycle detected; CPM values for unresolved tasks are best-effort"
        );
        cycles
    };

    let early = ForwardPass::new(tasks, &topo).execute();
    let project_finish = early
        .values()
        .map(|&(_, ef)| ef)
        .fold(0.0_f64, f64::max);
    let late = BackwardPass::new(tasks, &graph, &topo).execute(project_finish);

    let mut entries = BTreeMap::new();
    for task in tasks {
        let (es, ef) = early.get(&task.id).copied().unwrap_or((0.0, task.effective_duration()));
        let (ls, lf) = late.get(&task.id).copied().unwrap_or((es, ef));
        entries.insert(
            task.id.clone(),
            CpmInfo {
                duration: task.effective_duration(),
                es,
                ef,
                ls,
                lf,
            },
        );
    }

    debug!(tasks = entries.len(), project_finish, "computed CPM baseline");

    Baseline {
        entries,
        project_finish,
        order: topo.order,
        unresolved: topo.unresolved,
        cycles,
    }
}
