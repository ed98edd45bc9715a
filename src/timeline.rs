//! Presentation rows for Gantt and crew-utilisation views.
//!
//! The scheduler works in hour offsets; this module is where those offsets
//! meet the calendar, through a [`WorkClock`].

use crate::calendar::WorkClock;
use crate::error::ExportResult;
use crate::leveling::{LeveledSchedule, ScheduleEntry};
use crate::task::TaskId;
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub task_id: TaskId,
    pub label: String,
    pub section: String,
    pub crew: String,
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRow {
    pub crew: String,
    pub task: String,
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
}

fn task_label(entry: &ScheduleEntry) -> String {
    match entry.subsection.as_deref() {
        Some(subsection) => format!("{} ({subsection})", entry.name),
        None => entry.name.clone(),
    }
}

fn crew_or_na(entry: &ScheduleEntry) -> String {
    entry.crew_label().unwrap_or(NOT_AVAILABLE).to_string()
}

/// Entries by start time, ties by id.
fn chronological(schedule: &LeveledSchedule) -> Vec<(&TaskId, &ScheduleEntry)> {
    let mut entries: Vec<_> = schedule.iter().collect();
    entries.sort_by(|(a_id, a), (b_id, b)| a.start.total_cmp(&b.start).then_with(|| a_id.cmp(b_id)));
    entries
}

pub fn gantt_rows(schedule: &LeveledSchedule, clock: &WorkClock) -> Vec<GanttRow> {
    chronological(schedule)
        .into_iter()
        .map(|(id, entry)| GanttRow {
            task_id: id.clone(),
            label: task_label(entry),
            section: entry.section.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            crew: crew_or_na(entry),
            start: clock.start_at(entry.start),
            finish: clock.finish_at(entry.finish),
            duration_hours: entry.duration,
        })
        .collect()
}

pub fn resource_rows(schedule: &LeveledSchedule, clock: &WorkClock) -> Vec<ResourceRow> {
    let mut rows: Vec<ResourceRow> = chronological(schedule)
        .into_iter()
        .map(|(_, entry)| ResourceRow {
            crew: crew_or_na(entry),
            task: entry.name.clone(),
            start: clock.start_at(entry.start),
            finish: clock.finish_at(entry.finish),
        })
        .collect();
    rows.sort_by(|a, b| a.crew.cmp(&b.crew));
    rows
}

fn datetime_column(name: &'static str, values: Vec<i64>) -> PolarsResult<Column> {
    Ok(Series::new(PlSmallStr::from_static(name), values)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .into_column())
}

/// Gantt rows as a dataframe with `start`/`finish` datetime columns.
pub fn gantt_frame(schedule: &LeveledSchedule, clock: &WorkClock) -> ExportResult<DataFrame> {
    let rows = gantt_rows(schedule, clock);

    let ids: Vec<String> = rows.iter().map(|r| r.task_id.to_string()).collect();
    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
    let sections: Vec<String> = rows.iter().map(|r| r.section.clone()).collect();
    let crews: Vec<String> = rows.iter().map(|r| r.crew.clone()).collect();
    let starts: Vec<i64> = rows.iter().map(|r| r.start.and_utc().timestamp_millis()).collect();
    let finishes: Vec<i64> = rows.iter().map(|r| r.finish.and_utc().timestamp_millis()).collect();
    let durations: Vec<f64> = rows.iter().map(|r| r.duration_hours).collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("task_id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("task"), labels).into_column(),
        Series::new(PlSmallStr::from_static("section"), sections).into_column(),
        Series::new(PlSmallStr::from_static("crew"), crews).into_column(),
        datetime_column("start", starts)?,
        datetime_column("finish", finishes)?,
        Series::new(PlSmallStr::from_static("duration_hours"), durations).into_column(),
    ];
    Ok(DataFrame::new(columns)?)
}

pub fn write_gantt_csv<P: AsRef<Path>>(schedule: &LeveledSchedule, clock: &WorkClock, path: P) -> ExportResult<usize> {
    let rows = gantt_rows(schedule, clock);
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(rows = rows.len(), path = %path.as_ref().display(), "wrote gantt csv");
    Ok(rows.len())
}
