use crate::graph::TaskGraph;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Latest start and finish offsets, indexed by graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateTimes {
    pub late_start: Vec<i64>,
    pub late_finish: Vec<i64>,
}

pub struct BackwardPass<'a> {
    graph: &'a TaskGraph,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a TaskGraph) -> Self {
        Self { graph }
    }

    /// Walks `order` (topological, as produced for the forward pass) from the
    /// end, so every successor's late start is final before its
    /// predecessors read it.
    pub fn execute(&self, order: &[NodeIndex], project_duration: i64) -> LateTimes {
        let durations = self.graph.durations();
        let mut late_finish = vec![project_duration; durations.len()];
        let mut late_start: Vec<i64> = durations.iter().map(|d| project_duration - d).collect();

        for &node in order.iter().rev() {
            let lf = self
                .graph
                .successor_nodes(node)
                .into_iter()
                .map(|succ| late_start[succ.index()])
                .min()
                .unwrap_or(project_duration);
            late_finish[node.index()] = lf;
            late_start[node.index()] = lf - durations[node.index()];
        }

        debug!(tasks = order.len(), project_duration, "backward pass complete");
        LateTimes {
            late_start,
            late_finish,
        }
    }
}
