//! Greedy resource leveling on top of a CPM baseline.
//!
//! Tasks are visited once, by ascending (early start, planned day, name), and
//! placed at the earliest hour that satisfies both their dependencies and the
//! crew limits of the active mode. A task is never visited before one of its
//! dependencies from the same list unless a cycle leaves no other choice.
//!
//! This is a single-pass heuristic; it does not search for a minimal makespan.

mod category_pool;
mod crew_ledger;

use crate::calculations::Baseline;
use crate::task::{Task, TaskId, UNSPECIFIED_CREW};
use category_pool::CategoryPool;
use crew_ledger::CrewLedger;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelingOptions {
    /// Pool crews by category instead of treating each crew code as exclusive.
    #[serde(default)]
    pub pool_by_category: bool,
    /// Concurrent crews per category; absent categories get one.
    #[serde(default)]
    pub capacity_by_category: BTreeMap<String, u32>,
}

impl LevelingOptions {
    pub fn exact_crews() -> Self {
        Self::default()
    }

    pub fn pooled<I, K>(capacities: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            pool_by_category: true,
            capacity_by_category: capacities.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn capacity_for(&self, category: &str) -> usize {
        self.capacity_by_category
            .get(category)
            .copied()
            .unwrap_or(1)
            .max(1) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start: f64,
    pub finish: f64,
    pub duration: f64,
    pub crew_code: Option<String>,
    pub crew_category: Option<String>,
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub name: String,
    /// Set when the source had no duration and the task was scheduled as a milestone.
    #[serde(default)]
    pub missing_duration: bool,
    /// Leveled start minus CPM early start.
    #[serde(default)]
    pub delayed_by: f64,
}

impl ScheduleEntry {
    /// Crew label for presentation: exact code, then category.
    pub fn crew_label(&self) -> Option<&str> {
        self.crew_code.as_deref().or(self.crew_category.as_deref())
    }
}

/// Resource-feasible timings keyed by task id, in hours from project hour zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeveledSchedule {
    pub entries: BTreeMap<TaskId, ScheduleEntry>,
}

impl LeveledSchedule {
    pub fn get(&self, id: &TaskId) -> Option<&ScheduleEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &ScheduleEntry)> {
        self.entries.iter()
    }

    /// Latest finish across all entries; 0 when empty.
    pub fn finish(&self) -> f64 {
        self.entries
            .values()
            .map(|entry| entry.finish)
            .fold(0.0_f64, f64::max)
    }

    pub fn missing_durations(&self) -> Vec<TaskId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.missing_duration)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Places every task at its earliest resource-feasible start.
pub fn level_resources(tasks: &[Task], baseline: &Baseline, options: &LevelingOptions) -> LeveledSchedule {
    let early_start = |task: &Task| baseline.get(&task.id).map(|info| info.es).unwrap_or(0.0);

    let mut order: Vec<&Task> = tasks.iter().collect();
    order.sort_by(|a, b| {
        early_start(a)
            .total_cmp(&early_start(b))
            .then(a.planned_day.cmp(&b.planned_day))
            .then_with(|| a.name.cmp(&b.name))
    });

    let known: HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();
    let mut crews = CrewLedger::default();
    let mut pool = CategoryPool::default();
    let mut entries: BTreeMap<TaskId, ScheduleEntry> = BTreeMap::new();

    while !order.is_empty() {
        // First task in priority order whose listed dependencies are placed.
        // A zero-duration dependency can share its dependent's early start and
        // sort after it; cycles leave nothing ready, so take the head.
        let next = order
            .iter()
            .position(|t| {
                t.dependencies
                    .iter()
                    .all(|dep| !known.contains(dep) || entries.contains_key(dep))
            })
            .unwrap_or(0);
        let task = order.remove(next);

        let duration = task.effective_duration();
        let es = early_start(task);
        let ready = dependency_ready_time(task, &entries, baseline).max(es);

        let start = if !task.is_resource_bearing() {
            ready
        } else if options.pool_by_category {
            let category = task.crew_category.as_deref().unwrap_or(UNSPECIFIED_CREW);
            let start = pool.earliest_slot(category, ready, duration, options.capacity_for(category));
            pool.reserve(category, start, start + duration);
            start
        } else {
            let code = task.crew_code.as_deref().unwrap_or(UNSPECIFIED_CREW);
            let start = crews.earliest_start(code, ready);
            crews.reserve(code, start + duration);
            start
        };

        if start > ready {
            debug!(task = %task.id, ready, start, "crew limit delayed task");
        }

        entries.insert(
            task.id.clone(),
            ScheduleEntry {
                start,
                finish: start + duration,
                duration,
                crew_code: task.crew_code.clone(),
                crew_category: task.crew_category.clone(),
                section: task.section.clone(),
                subsection: task.subsection.clone(),
                name: task.name.clone(),
                missing_duration: !task.has_known_duration(),
                delayed_by: start - es,
            },
        );
    }

    LeveledSchedule { entries }
}

/// Latest finish among the task's dependencies. Dependencies not placed yet
/// (cycles, or filtered out upstream) fall back to their baseline early finish.
fn dependency_ready_time(task: &Task, placed: &BTreeMap<TaskId, ScheduleEntry>, baseline: &Baseline) -> f64 {
    let mut ready = 0.0_f64;
    for dep in &task.dependencies {
        if let Some(entry) = placed.get(dep) {
            ready = ready.max(entry.finish);
        } else if let Some(info) = baseline.get(dep) {
            ready = ready.max(info.ef);
        } else {
            trace!(task = %task.id, dependency = %dep, "dependency unknown to schedule and baseline");
        }
    }
    ready
}
