use crew_schedule::{Task, TaskId, compute_baseline};

fn diamond() -> Vec<Task> {
    vec![
        Task::new("T1", "Demo", Some(2.0)),
        Task::new("T2", "Rough plumbing", Some(3.0)).with_dependencies(["T1"]),
        Task::new("T3", "Rough electrical", Some(1.0)).with_dependencies(["T1"]),
        Task::new("T4", "Drywall", Some(2.0)).with_dependencies(["T2", "T3"]),
    ]
}

#[test]
fn forward_and_backward_passes_over_a_diamond() {
    let baseline = compute_baseline(&diamond());
    assert_eq!(baseline.project_finish, 7.0);

    let t2 = baseline.get(&TaskId::new("T2")).unwrap();
    assert_eq!((t2.es, t2.ef, t2.ls, t2.lf), (2.0, 5.0, 2.0, 5.0));

    let t3 = baseline.get(&TaskId::new("T3")).unwrap();
    assert_eq!((t3.es, t3.ef), (2.0, 3.0));
    assert_eq!((t3.ls, t3.lf), (4.0, 5.0));
    assert_eq!(t3.total_float(), 2.0);

    let t4 = baseline.get(&TaskId::new("T4")).unwrap();
    assert_eq!((t4.es, t4.ef, t4.ls, t4.lf), (5.0, 7.0, 5.0, 7.0));

    let path = baseline.critical_path();
    let critical: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
    assert_eq!(critical, vec!["T1", "T2", "T4"]);
}

#[test]
fn late_finish_never_exceeds_project_finish() {
    let baseline = compute_baseline(&diamond());
    for info in baseline.entries.values() {
        assert!(info.lf <= baseline.project_finish);
        assert!(info.ls >= info.es - 1e-9);
    }
}

#[test]
fn unknown_durations_are_zero_length() {
    let tasks = vec![
        Task::new("A", "Inspection", None),
        Task::new("B", "Close walls", Some(4.0)).with_dependencies(["A"]),
    ];
    let baseline = compute_baseline(&tasks);
    let a = baseline.get(&TaskId::new("A")).unwrap();
    assert_eq!((a.es, a.ef), (0.0, 0.0));
    assert_eq!(baseline.project_finish, 4.0);
}

#[test]
fn empty_task_list_gives_empty_baseline() {
    let baseline = compute_baseline(&[]);
    assert!(baseline.is_empty());
    assert_eq!(baseline.project_finish, 0.0);
}

#[test]
fn cycles_are_reported_alongside_best_effort_values() {
    let tasks = vec![
        Task::new("A", "Tile", Some(2.0)).with_dependencies(["B"]),
        Task::new("B", "Grout", Some(1.0)).with_dependencies(["A"]),
        Task::new("C", "Paint", Some(3.0)),
    ];
    let baseline = compute_baseline(&tasks);
    assert!(!baseline.is_trustworthy());
    assert_eq!(baseline.cycles.len(), 1);
    assert_eq!(baseline.len(), 3);
    assert_eq!(baseline.get(&TaskId::new("C")).unwrap().ef, 3.0);
}
