pub mod board;
pub mod calculations;
pub mod column;
pub mod config;
pub mod dependency;
pub mod error;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod resource;
pub mod schedule;
pub mod task;
pub mod views;

pub use board::{BoardError, BoardScheduler};
pub use column::ColumnKind;
pub use config::{DanglingPolicy, EngineConfig};
pub use dependency::{Dependency, DependencyKind};
pub use error::{EngineResult, ScheduleError};
pub use graph::{TaskGraph, TaskGraphBuilder, TopologicalScheduler};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBoardStore;
pub use persistence::{
    BoardRepository, BoardSnapshot, CapacityRepository, DependencyRepository, MemoryBoardStore,
    RepositoryError, TaskRepository, UserDirectory,
};
pub use resource::{CapacityPlanner, ResourceCapacity, WorkloadRow, compute_workload};
pub use schedule::{
    BoardInput, ProjectSchedule, ScheduleMaterializer, ScheduleResult, ScheduleSummary,
    compute_schedule, compute_schedule_with, schedule_boards,
};
pub use task::{BoardId, Task, TaskId, UserId};
pub use views::{GanttTask, GanttView, WorkloadView};
