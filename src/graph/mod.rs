pub mod dependency_graph;

pub use dependency_graph::{DependencyGraph, TopoOrder};

use crate::task::Task;
use tracing::warn;

/// Dependency-respecting order of task ids. Tasks stuck behind a cycle are
/// appended after every resolvable task rather than dropped.
pub fn topological_order(tasks: &[Task]) -> TopoOrder {
    let topo = DependencyGraph::build(tasks).topological_order();
    if !topo.is_complete() {
        warn!(
            unresolved = topo.unresolved.len(),
            "dependency cycle: appending unresolved tasks after the resolvable order"
        );
    }
    topo
}
