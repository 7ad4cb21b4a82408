use crate::dependency::{Dependency, DependencyKind};
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub mod builder;
pub mod topo;

pub use builder::TaskGraphBuilder;
pub use topo::TopologicalScheduler;

/// Dependency graph of one board.
///
/// Node `i` holds the `i`-th task of the builder input, so node order is the
/// board's task order. Edges point from predecessor to successor.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    pub graph: DiGraph<TaskId, DependencyKind>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    tasks: Vec<Task>,
    durations: Vec<i64>,
    anchor_date: NaiveDate,
    skipped: Vec<Dependency>,
}

impl TaskGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<TaskId, DependencyKind>,
        id_to_index: HashMap<TaskId, NodeIndex>,
        tasks: Vec<Task>,
        anchor_date: NaiveDate,
        skipped: Vec<Dependency>,
    ) -> Self {
        let durations = tasks.iter().map(Task::duration_days).collect();
        Self {
            graph,
            id_to_index,
            tasks,
            durations,
            anchor_date,
            skipped,
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.id_to_index.get(&id).map(|ix| &self.tasks[ix.index()])
    }

    pub fn task_at(&self, node: NodeIndex) -> &Task {
        &self.tasks[node.index()]
    }

    /// Durations indexed by node.
    pub fn durations(&self) -> &[i64] {
        &self.durations
    }

    pub fn duration(&self, id: TaskId) -> Option<i64> {
        self.id_to_index.get(&id).map(|ix| self.durations[ix.index()])
    }

    /// Earliest explicit start on the board, or the fallback supplied to the
    /// builder.
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    /// Dependencies dropped because an endpoint is not on the board.
    pub fn skipped_dependencies(&self) -> &[Dependency] {
        &self.skipped
    }

    /// Predecessor nodes in task order.
    pub fn predecessor_nodes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_task_order(node, Direction::Incoming)
    }

    /// Successor nodes in task order.
    pub fn successor_nodes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_task_order(node, Direction::Outgoing)
    }

    pub fn predecessors(&self, id: TaskId) -> Vec<TaskId> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    pub fn successors(&self, id: TaskId) -> Vec<TaskId> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbor_ids(&self, id: TaskId, direction: Direction) -> Vec<TaskId> {
        match self.id_to_index.get(&id) {
            Some(&node) => self
                .neighbors_in_task_order(node, direction)
                .into_iter()
                .map(|ix| self.graph[ix])
                .collect(),
            None => Vec::new(),
        }
    }

    // petgraph yields neighbors newest-edge-first; sort so traversal depends
    // only on task order.
    fn neighbors_in_task_order(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(node, direction).collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}
