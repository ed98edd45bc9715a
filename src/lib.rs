pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod leveling;
pub mod logging;
pub mod metrics;
pub mod notes;
pub mod scenarios;
pub mod schedule;
pub mod task;
pub mod task_validation;
pub mod timeline;

#[cfg(feature = "http_api")]
pub mod http_api;

pub use calculations::{Baseline, CpmInfo, compute_baseline};
pub use calendar::WorkClock;
pub use config::{CyclePolicy, SchedulerConfig};
pub use error::{
    ConfigError, ExportError, IngestError, NoteCacheError, ScheduleError, ScheduleResult,
};
pub use graph::{DependencyGraph, TopoOrder, topological_order};
pub use ingest::{IngestOptions, IngestOutcome, filter_sections, parse_wide_csv, parse_wide_csv_path};
pub use leveling::{LeveledSchedule, LevelingOptions, ScheduleEntry, level_resources};
pub use metrics::{ProjectMetrics, TargetCheck, compute_metrics};
pub use scenarios::{Scenario, ScenarioOutcome, evaluate_scenarios, fastest};
pub use schedule::{PreparedBaseline, ScheduleReport, plan_schedule, prepare_baseline};
pub use task::{Task, TaskId, UNSPECIFIED_CREW};
pub use task_validation::{ValidationReport, validate_task, validate_tasks};
