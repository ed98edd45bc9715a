use crew_schedule::{DependencyGraph, Task, TaskId, topological_order};

fn ids(list: &[&str]) -> Vec<TaskId> {
    list.iter().map(|s| TaskId::new(*s)).collect()
}

#[test]
fn ready_tasks_are_released_first_in_first_out() {
    let tasks = vec![
        Task::new("A", "Demo", Some(2.0)),
        Task::new("B", "Frame", Some(3.0)).with_dependencies(["A"]),
        Task::new("C", "Board", Some(1.0)).with_dependencies(["B"]),
        Task::new("D", "Order fixtures", Some(1.0)),
    ];

    let topo = topological_order(&tasks);
    assert!(topo.is_complete());
    assert_eq!(topo.order, ids(&["A", "D", "B", "C"]));
}

#[test]
fn cyclic_tasks_are_appended_not_dropped() {
    let tasks = vec![
        Task::new("X", "Tile", Some(1.0)).with_dependencies(["Y"]),
        Task::new("Y", "Grout", Some(1.0)).with_dependencies(["X"]),
        Task::new("Z", "Paint", Some(1.0)),
        Task::new("W", "Seal", Some(1.0)).with_dependencies(["X"]),
    ];

    let topo = topological_order(&tasks);
    assert!(!topo.is_complete());
    assert_eq!(topo.order, ids(&["Z"]));
    assert_eq!(topo.unresolved, ids(&["X", "Y", "W"]));
    assert_eq!(topo.full_order().count(), tasks.len());

    let graph = DependencyGraph::build(&tasks);
    assert_eq!(graph.cycles(), vec![ids(&["X", "Y"])]);
}

#[test]
fn dependencies_outside_the_list_do_not_block_ordering() {
    let tasks = vec![
        Task::new("A", "Hang door", Some(1.0)).with_dependencies(["ghost"]),
        Task::new("B", "Trim door", Some(1.0)).with_dependencies(["A"]),
    ];

    let graph = DependencyGraph::build(&tasks);
    assert_eq!(graph.in_degree(&TaskId::new("A")), Some(0));
    assert_eq!(graph.dangling(), &[(TaskId::new("A"), TaskId::new("ghost"))]);
    assert_eq!(graph.successors(&TaskId::new("A")), vec![&TaskId::new("B")]);
    assert_eq!(graph.topological_order().order, ids(&["A", "B"]));
}
