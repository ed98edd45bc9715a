use crate::task::{Task, TaskId};
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, VecDeque};

/// Precedence graph over a task list. Node `i` is the task at position `i`;
/// edges point from a dependency to its dependent.
pub struct DependencyGraph {
    pub graph: DiGraph<TaskId, ()>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    in_degree: Vec<usize>,
    dangling: Vec<(TaskId, TaskId)>,
}

/// Output of the Kahn pass: resolvable tasks first, then anything a cycle
/// kept from reaching in-degree zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopoOrder {
    pub order: Vec<TaskId>,
    pub unresolved: Vec<TaskId>,
}

impl TopoOrder {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Resolved ids followed by the unresolved tail.
    pub fn full_order(&self) -> impl Iterator<Item = &TaskId> {
        self.order.iter().chain(self.unresolved.iter())
    }
}

impl DependencyGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());

        for task in tasks {
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.entry(task.id.clone()).or_insert(node_ix);
        }

        let mut in_degree = vec![0usize; tasks.len()];
        let mut dangling = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            let task_ix = NodeIndex::new(idx);
            for dep in &task.dependencies {
                match id_to_index.get(dep) {
                    Some(&dep_ix) => {
                        graph.add_edge(dep_ix, task_ix, ());
                        in_degree[idx] += 1;
                    }
                    None => dangling.push((task.id.clone(), dep.clone())),
                }
            }
        }

        Self {
            graph,
            id_to_index,
            in_degree,
            dangling,
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of dependencies of `id` that are present in the list.
    pub fn in_degree(&self, id: &TaskId) -> Option<usize> {
        self.id_to_index
            .get(id)
            .map(|ix| self.in_degree[ix.index()])
    }

    pub fn dangling(&self) -> &[(TaskId, TaskId)] {
        &self.dangling
    }

    fn neighbors_in_order(&self, ix: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(ix, direction).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Tasks that list `id` as a dependency, in task-list order.
    pub fn successors(&self, id: &TaskId) -> Vec<&TaskId> {
        self.id_to_index
            .get(id)
            .map(|&ix| {
                self.neighbors_in_order(ix, Direction::Outgoing)
                    .into_iter()
                    .map(|succ| &self.graph[succ])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn predecessors(&self, id: &TaskId) -> Vec<&TaskId> {
        self.id_to_index
            .get(id)
            .map(|&ix| {
                self.neighbors_in_order(ix, Direction::Incoming)
                    .into_iter()
                    .map(|pred| &self.graph[pred])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Kahn's algorithm with a FIFO ready queue.
    pub fn topological_order(&self) -> TopoOrder {
        let mut in_degree = self.in_degree.clone();
        let mut placed = vec![false; self.len()];
        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| in_degree[ix.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(ix) = queue.pop_front() {
            placed[ix.index()] = true;
            order.push(self.graph[ix].clone());
            for succ in self.neighbors_in_order(ix, Direction::Outgoing) {
                let degree = &mut in_degree[succ.index()];
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        let unresolved = self
            .graph
            .node_indices()
            .filter(|ix| !placed[ix.index()])
            .map(|ix| self.graph[ix].clone())
            .collect();

        TopoOrder { order, unresolved }
    }

    /// Groups of tasks that depend on each other in a loop.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&ix| self.graph.contains_edge(ix, ix))
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        components.sort_by_key(|component| component[0]);
        components
            .into_iter()
            .map(|component| component.into_iter().map(|ix| self.graph[ix].clone()).collect())
            .collect()
    }
}
