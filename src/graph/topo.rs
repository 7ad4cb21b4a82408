use super::TaskGraph;
use crate::error::{EngineResult, ScheduleError};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;
use tracing::warn;

/// Kahn's algorithm over a [`TaskGraph`].
///
/// Zero in-degree tasks are queued first-in first-out, seeded in board order,
/// and successors are released in board order, so the same input always
/// yields the same ordering.
pub struct TopologicalScheduler<'a> {
    graph: &'a TaskGraph,
}

impl<'a> TopologicalScheduler<'a> {
    pub fn new(graph: &'a TaskGraph) -> Self {
        Self { graph }
    }

    /// Node order with every predecessor ahead of its successors.
    ///
    /// Fails with [`ScheduleError::CycleDetected`] when some tasks can never
    /// reach zero in-degree.
    pub fn order(&self) -> EngineResult<Vec<NodeIndex>> {
        let dag = &self.graph.graph;
        let mut in_degree: Vec<usize> = dag
            .node_indices()
            .map(|node| self.in_degree(node))
            .collect();

        let mut queue: VecDeque<NodeIndex> = dag
            .node_indices()
            .filter(|node| in_degree[node.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(dag.node_count());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for succ in self.graph.successor_nodes(node) {
                let degree = &mut in_degree[succ.index()];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() < dag.node_count() {
            let mut stuck: Vec<_> = dag
                .node_indices()
                .filter(|node| in_degree[node.index()] > 0)
                .map(|node| dag[node])
                .collect();
            stuck.sort_unstable();
            warn!(
                ordered = order.len(),
                total = dag.node_count(),
                "dependency cycle prevents scheduling"
            );
            return Err(ScheduleError::CycleDetected { tasks: stuck });
        }

        Ok(order)
    }

    /// Same as [`order`](Self::order) but as task ids.
    pub fn task_order(&self) -> EngineResult<Vec<crate::task::TaskId>> {
        Ok(self
            .order()?
            .into_iter()
            .map(|node| self.graph.graph[node])
            .collect())
    }

    /// Number of predecessors of `node`. Repeated edges were collapsed by
    /// the builder, so each predecessor counts once.
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .count()
    }
}
