use chrono::{NaiveDate, NaiveTime};
use crew_schedule::timeline::{gantt_frame, gantt_rows, resource_rows, write_gantt_csv};
use crew_schedule::{SchedulerConfig, Task, WorkClock, plan_schedule};
use std::fs;
use tempfile::tempdir;

fn report() -> crew_schedule::ScheduleReport {
    let tasks = vec![
        Task::new("T0000", "Demo", Some(8.0))
            .with_section("Kitchen")
            .with_subsection("Walls")
            .with_crew_code("1"),
        Task::new("T0001", "Order parts", Some(2.0)),
        Task::new("T0002", "Patch", Some(4.0))
            .with_crew_category("2")
            .with_dependencies(["T0000"]),
    ];
    plan_schedule(&tasks, &SchedulerConfig::default()).unwrap()
}

fn clock() -> WorkClock {
    WorkClock::new(
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        8.0,
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    )
}

#[test]
fn gantt_rows_label_and_place_tasks() {
    let rows = gantt_rows(&report().schedule, &clock());
    assert_eq!(rows.len(), 3);

    let demo = rows.iter().find(|r| r.task_id.as_str() == "T0000").unwrap();
    assert_eq!(demo.label, "Demo (Walls)");
    assert_eq!(demo.section, "Kitchen");
    assert_eq!(demo.crew, "1");
    assert_eq!(demo.start.to_string(), "2025-06-02 08:00:00");
    assert_eq!(demo.finish.to_string(), "2025-06-02 16:00:00");

    let order = rows.iter().find(|r| r.task_id.as_str() == "T0001").unwrap();
    assert_eq!(order.section, "N/A");
    assert_eq!(order.crew, "N/A");

    let patch = rows.iter().find(|r| r.task_id.as_str() == "T0002").unwrap();
    assert_eq!(patch.crew, "2");
    assert_eq!(patch.start.to_string(), "2025-06-03 08:00:00");
}

#[test]
fn resource_rows_group_by_crew() {
    let rows = resource_rows(&report().schedule, &clock());
    let crews: Vec<&str> = rows.iter().map(|r| r.crew.as_str()).collect();
    assert_eq!(crews, vec!["1", "2", "N/A"]);
}

#[test]
fn gantt_frame_has_datetime_columns() {
    let df = gantt_frame(&report().schedule, &clock()).unwrap();
    assert_eq!(df.height(), 3);
    assert!(matches!(
        df.column("start").unwrap().dtype(),
        polars::prelude::DataType::Datetime(_, _)
    ));
}

#[test]
fn gantt_csv_has_one_line_per_task() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gantt.csv");
    let written = write_gantt_csv(&report().schedule, &clock(), &path).unwrap();
    assert_eq!(written, 3);

    let body = fs::read_to_string(&path).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("task_id,label,section,crew,start,finish,duration_hours")
    );
    assert_eq!(lines.count(), 3);
}
