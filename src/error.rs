use crate::task::TaskId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the boundary of the scheduling core.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("task {id} is invalid: {reason}")]
    InvalidTask { id: String, reason: String },
    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),
    #[error("task {0} lists itself as a dependency")]
    SelfDependency(TaskId),
    #[error("dependency cycle leaves {} task(s) unordered: {}", .tasks.len(), join_ids(.tasks))]
    CycleDetected { tasks: Vec<TaskId> },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum NoteCacheError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("could not extract notes from {path:?}: {message}")]
    Extraction { path: PathBuf, message: String },
}

pub type NoteCacheResult<T> = Result<T, NoteCacheError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

pub type ExportResult<T> = Result<T, ExportError>;

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
