use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::persistence::{BoardRepository, RepositoryError};
use crate::resource::{CapacityPlanner, WorkloadRow};
use crate::schedule::{ProjectSchedule, compute_schedule_with};
use crate::task::BoardId;
use crate::views::{GanttView, WorkloadView};
use tracing::{info_span, warn};

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Loads a board through its repository and runs the scheduling or workload
/// pipeline. Holds no per-board state; every call recomputes.
pub struct BoardScheduler<R> {
    repository: R,
    config: EngineConfig,
}

impl<R: BoardRepository> BoardScheduler<R> {
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, EngineConfig::default())
    }

    pub fn with_config(repository: R, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn schedule(&self, board_id: BoardId) -> Result<ProjectSchedule, BoardError> {
        let _span = info_span!("schedule", board_id).entered();
        let tasks = self.repository.tasks_for_board(board_id)?;
        let dependencies = self.repository.dependencies_for_board(board_id)?;
        compute_schedule_with(&tasks, &dependencies, &self.config).map_err(|err| {
            warn!(board_id, error = %err, "board cannot be scheduled");
            BoardError::from(err)
        })
    }

    pub fn gantt(&self, board_id: BoardId) -> Result<GanttView, BoardError> {
        let schedule = self.schedule(board_id)?;
        Ok(GanttView::from(&schedule))
    }

    pub fn workload_rows(&self, board_id: BoardId) -> Result<Vec<WorkloadRow>, BoardError> {
        let _span = info_span!("workload", board_id).entered();
        let tasks = self.repository.tasks_for_board(board_id)?;
        let capacities = self.repository.capacities_for_board(board_id)?;
        let usernames = self.repository.usernames()?;
        Ok(CapacityPlanner::new(&tasks, &capacities)
            .with_usernames(&usernames)
            .with_config(&self.config)
            .execute())
    }

    pub fn workload(&self, board_id: BoardId) -> Result<WorkloadView, BoardError> {
        let rows = self.workload_rows(board_id)?;
        Ok(WorkloadView::new(rows, self.config.hours_precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Dependency;
    use crate::persistence::MemoryBoardStore;
    use crate::schedule::BoardInput;
    use crate::task::Task;

    fn store() -> MemoryBoardStore {
        let store = MemoryBoardStore::new();
        store.put_board(BoardInput {
            board_id: 1,
            tasks: vec![Task::new(1, "A").assigned_to(7).with_estimate(12.0)],
            dependencies: vec![],
        });
        store.put_board(BoardInput {
            board_id: 2,
            tasks: vec![Task::new(1, "A"), Task::new(2, "B")],
            dependencies: vec![Dependency::new(1, 2), Dependency::new(2, 1)],
        });
        store.set_username(7, "kim");
        store
    }

    #[test]
    fn cyclic_board_reports_schedule_error() {
        let scheduler = BoardScheduler::new(store());
        let err = scheduler.gantt(2).unwrap_err();
        assert!(matches!(err, BoardError::Schedule(ref e) if e.is_cycle()));
    }

    #[test]
    fn missing_board_reports_repository_error() {
        let scheduler = BoardScheduler::new(store());
        assert!(matches!(
            scheduler.workload(99),
            Err(BoardError::Repository(RepositoryError::BoardNotFound(99)))
        ));
    }

    #[test]
    fn workload_uses_directory_names() {
        let scheduler = BoardScheduler::new(store());
        let view = scheduler.workload(1).unwrap();
        assert_eq!(view.rows[0].username, "kim");
        assert_eq!(view.rows[0].utilization, 0.3);
    }

    #[test]
    fn works_through_a_boxed_repository() {
        let boxed: Box<dyn BoardRepository + Send + Sync> = Box::new(store());
        let scheduler = BoardScheduler::new(boxed);
        assert_eq!(scheduler.gantt(1).unwrap().project_duration_days, 1);
    }
}
