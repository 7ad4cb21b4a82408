use super::TaskGraph;
use crate::config::DanglingPolicy;
use crate::dependency::{Dependency, DependencyKind};
use crate::error::{EngineResult, ScheduleError};
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct TaskGraphBuilder<'a> {
    tasks: &'a [Task],
    dependencies: &'a [Dependency],
    fallback_anchor: NaiveDate,
    dangling: DanglingPolicy,
}

impl<'a> TaskGraphBuilder<'a> {
    pub fn new(tasks: &'a [Task], dependencies: &'a [Dependency], fallback_anchor: NaiveDate) -> Self {
        Self {
            tasks,
            dependencies,
            fallback_anchor,
            dangling: DanglingPolicy::Skip,
        }
    }

    pub fn dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling = policy;
        self
    }

    pub fn build(&self) -> EngineResult<TaskGraph> {
        let mut graph: DiGraph<TaskId, DependencyKind> =
            DiGraph::with_capacity(self.tasks.len(), self.dependencies.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(self.tasks.len());
        let mut min_start: Option<NaiveDate> = None;

        // Nodes first, in board order
        for task in self.tasks {
            if id_to_index.contains_key(&task.id) {
                return Err(ScheduleError::DuplicateTask { id: task.id });
            }
            let node = graph.add_node(task.id);
            id_to_index.insert(task.id, node);

            if let Some(start) = task.start_date {
                if min_start.is_none_or(|current| start < current) {
                    min_start = Some(start);
                }
            }
        }

        // Edges: predecessor -> successor
        let mut skipped = Vec::new();
        for dep in self.dependencies {
            let endpoints = (
                id_to_index.get(&dep.predecessor_id),
                id_to_index.get(&dep.successor_id),
            );
            let (Some(&from), Some(&to)) = endpoints else {
                if self.dangling == DanglingPolicy::Reject {
                    return Err(ScheduleError::DanglingDependency {
                        predecessor: dep.predecessor_id,
                        successor: dep.successor_id,
                    });
                }
                warn!(
                    predecessor = dep.predecessor_id,
                    successor = dep.successor_id,
                    "skipping dependency that references a task outside the board"
                );
                skipped.push(dep.clone());
                continue;
            };

            if graph.find_edge(from, to).is_some() {
                debug!(
                    predecessor = dep.predecessor_id,
                    successor = dep.successor_id,
                    "collapsing repeated dependency"
                );
                continue;
            }
            graph.add_edge(from, to, dep.kind);
        }

        let anchor_date = min_start.unwrap_or(self.fallback_anchor);
        debug!(
            tasks = graph.node_count(),
            edges = graph.edge_count(),
            skipped = skipped.len(),
            %anchor_date,
            "assembled task graph"
        );

        Ok(TaskGraph::from_parts(
            graph,
            id_to_index,
            self.tasks.to_vec(),
            anchor_date,
            skipped,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fallback() -> NaiveDate {
        d(2030, 1, 1)
    }

    #[test]
    fn builds_predecessor_and_successor_sets() {
        let tasks = vec![Task::new(1, "A"), Task::new(2, "B"), Task::new(3, "C")];
        let deps = vec![Dependency::new(1, 2), Dependency::new(1, 3)];
        let graph = TaskGraphBuilder::new(&tasks, &deps, fallback()).build().unwrap();

        assert_eq!(graph.task_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(1), vec![2, 3]);
        assert_eq!(graph.predecessors(3), vec![1]);
        assert!(graph.predecessors(1).is_empty());
    }

    #[test]
    fn dangling_references_are_skipped_and_recorded() {
        let tasks = vec![Task::new(1, "A"), Task::new(2, "B")];
        let deps = vec![
            Dependency::new(1, 2),
            Dependency::new(9, 2),
            Dependency::new(1, 42),
        ];
        let graph = TaskGraphBuilder::new(&tasks, &deps, fallback()).build().unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.skipped_dependencies(),
            &[Dependency::new(9, 2), Dependency::new(1, 42)]
        );
    }

    #[test]
    fn reject_policy_surfaces_dangling_reference() {
        let tasks = vec![Task::new(1, "A")];
        let deps = vec![Dependency::new(1, 5)];
        let err = TaskGraphBuilder::new(&tasks, &deps, fallback())
            .dangling_policy(DanglingPolicy::Reject)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::DanglingDependency {
                predecessor: 1,
                successor: 5
            }
        );
    }

    #[test]
    fn repeated_edges_collapse() {
        let tasks = vec![Task::new(1, "A"), Task::new(2, "B")];
        let deps = vec![
            Dependency::new(1, 2),
            Dependency::with_kind(1, 2, DependencyKind::StartToStart),
        ];
        let graph = TaskGraphBuilder::new(&tasks, &deps, fallback()).build().unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.skipped_dependencies().is_empty());
    }

    #[test]
    fn anchor_is_minimum_explicit_start() {
        let tasks = vec![
            Task::new(1, "A").with_start(d(2025, 5, 10)),
            Task::new(2, "B"),
            Task::new(3, "C").with_dates(d(2025, 5, 2), d(2025, 5, 4)),
        ];
        let graph = TaskGraphBuilder::new(&tasks, &[], fallback()).build().unwrap();
        assert_eq!(graph.anchor_date(), d(2025, 5, 2));
        assert_eq!(graph.duration(3), Some(3));
        assert_eq!(graph.duration(2), Some(1));
    }

    #[test]
    fn anchor_falls_back_without_explicit_starts() {
        let tasks = vec![Task::new(1, "A").with_end(d(2025, 5, 10))];
        let graph = TaskGraphBuilder::new(&tasks, &[], fallback()).build().unwrap();
        assert_eq!(graph.anchor_date(), fallback());
    }

    #[test]
    fn duplicate_task_ids_are_rejected() {
        let tasks = vec![Task::new(1, "A"), Task::new(1, "A again")];
        let err = TaskGraphBuilder::new(&tasks, &[], fallback()).build().unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateTask { id: 1 });
    }
}
