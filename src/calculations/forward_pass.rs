use crate::graph::TaskGraph;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Earliest start and finish offsets, indexed by graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyTimes {
    pub early_start: Vec<i64>,
    pub early_finish: Vec<i64>,
}

impl EarlyTimes {
    /// Largest early finish, or 0 for an empty board.
    pub fn project_duration(&self) -> i64 {
        self.early_finish.iter().copied().max().unwrap_or(0)
    }
}

pub struct ForwardPass<'a> {
    graph: &'a TaskGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a TaskGraph) -> Self {
        Self { graph }
    }

    /// `order` must be topological; each predecessor's finish is then final
    /// by the time its successors are visited.
    pub fn execute(&self, order: &[NodeIndex]) -> EarlyTimes {
        let durations = self.graph.durations();
        let mut early_start = vec![0_i64; durations.len()];
        let mut early_finish = durations.to_vec();

        for &node in order {
            let es = self
                .graph
                .predecessor_nodes(node)
                .into_iter()
                .map(|pred| early_finish[pred.index()])
                .max()
                .unwrap_or(0);
            early_start[node.index()] = es;
            early_finish[node.index()] = es + durations[node.index()];
        }

        let times = EarlyTimes {
            early_start,
            early_finish,
        };
        debug!(
            tasks = order.len(),
            project_duration = times.project_duration(),
            "forward pass complete"
        );
        times
    }
}
