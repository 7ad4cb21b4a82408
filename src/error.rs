//! Error types for the scheduling pipeline.

use crate::task::TaskId;

pub type EngineResult<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Kahn's algorithm could not order every task. `tasks` lists the ids
    /// that still had unresolved predecessors, ascending.
    #[error("cyclic dependency detected among tasks {}", format_ids(.tasks))]
    CycleDetected { tasks: Vec<TaskId> },

    /// A dependency names a task outside the board. Only raised under
    /// [`DanglingPolicy::Reject`](crate::config::DanglingPolicy::Reject).
    #[error("dependency {predecessor} -> {successor} references a task that is not on the board")]
    DanglingDependency {
        predecessor: TaskId,
        successor: TaskId,
    },

    #[error("duplicate task id {id}")]
    DuplicateTask { id: TaskId },

    /// A computed date falls outside the supported calendar range.
    #[error("task {task} would be scheduled past the supported date range")]
    DateOutOfRange { task: TaskId },
}

impl ScheduleError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, ScheduleError::CycleDetected { .. })
    }

    /// Message suitable for showing to board users.
    pub fn user_message(&self) -> String {
        match self {
            ScheduleError::CycleDetected { .. } => {
                "scheduling unavailable for this board: cyclic dependency detected".to_string()
            }
            other => format!("scheduling unavailable for this board: {other}"),
        }
    }
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
