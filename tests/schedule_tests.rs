use crew_schedule::{CyclePolicy, ScheduleError, SchedulerConfig, Task, TaskId, plan_schedule};

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("T0000", "Demo", Some(8.0))
            .with_section("Kitchen")
            .with_crew_code("1"),
        Task::new("T0001", "Cabinets", Some(8.0))
            .with_section("Kitchen")
            .with_crew_code("2")
            .with_dependencies(["T0000"]),
        Task::new("T0002", "Vanity", Some(4.0))
            .with_section("Bath")
            .with_crew_code("2"),
    ]
}

#[test]
fn plans_a_full_report() {
    let report = plan_schedule(&sample_tasks(), &SchedulerConfig::default()).unwrap();

    assert_eq!(report.task_count(), 3);
    assert_eq!(report.metrics.finish_hours, 16.0);
    assert_eq!(report.metrics.duration_days, 2.0);
    assert!(report.unresolved.is_empty());
    assert!(report.warnings.is_empty());
    assert!(report.to_cli_summary().contains("tasks=3"));
}

#[test]
fn section_filter_limits_the_plan() {
    let config = SchedulerConfig {
        sections: vec!["Bath".to_string()],
        ..SchedulerConfig::default()
    };
    let report = plan_schedule(&sample_tasks(), &config).unwrap();
    assert_eq!(report.task_count(), 1);
    assert!(report.schedule.get(&TaskId::new("T0002")).is_some());
    assert_eq!(report.metrics.duration_days, 0.5);
}

#[test]
fn target_overrun_produces_advice() {
    let config = SchedulerConfig {
        target_days: Some(1.0),
        ..SchedulerConfig::default()
    };
    let report = plan_schedule(&sample_tasks(), &config).unwrap();
    let target = report.target.as_ref().unwrap();
    assert!(target.exceeded);
    assert!(report.warnings.iter().any(|w| w.contains("exceeds target")));
}

fn cyclic_tasks() -> Vec<Task> {
    vec![
        Task::new("A", "Tile", Some(2.0)).with_dependencies(["B"]),
        Task::new("B", "Grout", Some(1.0)).with_dependencies(["A"]),
        Task::new("C", "Paint", Some(3.0)),
    ]
}

#[test]
fn cycles_degrade_by_default() {
    let report = plan_schedule(&cyclic_tasks(), &SchedulerConfig::default()).unwrap();
    assert_eq!(report.task_count(), 3);
    assert_eq!(report.unresolved, vec![TaskId::new("A"), TaskId::new("B")]);
    assert_eq!(report.cycles.len(), 1);
    assert!(!report.warnings.is_empty());
}

#[test]
fn cycles_can_be_rejected() {
    let config = SchedulerConfig {
        cycle_policy: CyclePolicy::Reject,
        ..SchedulerConfig::default()
    };
    let err = plan_schedule(&cyclic_tasks(), &config).unwrap_err();
    match err {
        ScheduleError::CycleDetected { tasks } => assert_eq!(tasks.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_tasks_are_rejected_at_the_boundary() {
    let duplicate = vec![Task::new("A", "One", Some(1.0)), Task::new("A", "Two", Some(1.0))];
    assert!(matches!(
        plan_schedule(&duplicate, &SchedulerConfig::default()),
        Err(ScheduleError::DuplicateTaskId(_))
    ));

    let negative = vec![Task::new("A", "One", Some(-1.0))];
    assert!(matches!(
        plan_schedule(&negative, &SchedulerConfig::default()),
        Err(ScheduleError::InvalidTask { .. })
    ));

    let selfish = vec![Task::new("A", "One", Some(1.0)).with_dependencies(["A"])];
    assert!(matches!(
        plan_schedule(&selfish, &SchedulerConfig::default()),
        Err(ScheduleError::SelfDependency(_))
    ));
}

#[test]
fn missing_durations_are_reported() {
    let tasks = vec![Task::new("A", "Walkthrough", None), Task::new("B", "Paint", Some(2.0))];
    let report = plan_schedule(&tasks, &SchedulerConfig::default()).unwrap();
    assert_eq!(report.missing_durations, vec![TaskId::new("A")]);
    assert!(report.warnings.iter().any(|w| w.contains("no duration")));
}

#[test]
fn empty_task_list_is_a_zero_day_project() {
    let report = plan_schedule(&[], &SchedulerConfig::default()).unwrap();
    assert!(report.schedule.is_empty());
    assert!(report.baseline.is_empty());
    assert_eq!(report.metrics.duration_days, 0.0);
}

#[test]
fn dependencies_cut_by_the_section_filter_are_reported() {
    let tasks = vec![
        Task::new("T0000", "Demo", Some(8.0)).with_section("Kitchen"),
        Task::new("T0001", "Vanity", Some(4.0))
            .with_section("Bath")
            .with_dependencies(["T0000"]),
    ];
    let config = SchedulerConfig {
        sections: vec!["Bath".to_string()],
        ..SchedulerConfig::default()
    };
    let report = plan_schedule(&tasks, &config).unwrap();

    assert_eq!(report.task_count(), 1);
    assert_eq!(report.schedule.get(&TaskId::new("T0001")).unwrap().start, 0.0);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("T0001") && w.contains("outside the selected sections"))
    );
}

#[test]
fn unfiltered_plans_do_not_warn_about_sections() {
    let tasks = vec![
        Task::new("T0000", "Demo", Some(8.0)).with_section("Kitchen"),
        Task::new("T0001", "Vanity", Some(4.0))
            .with_section("Bath")
            .with_dependencies(["T0000"]),
    ];
    let report = plan_schedule(&tasks, &SchedulerConfig::default()).unwrap();
    assert!(report.warnings.is_empty());
}
