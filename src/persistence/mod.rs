//! Read-only access to the records the engine consumes.
//!
//! The board collaborator owns all writes; the engine only ever fetches the
//! full set of tasks, dependencies and capacities for one board.

use crate::dependency::Dependency;
use crate::resource::ResourceCapacity;
use crate::task::{BoardId, Task, UserId};
use serde_json::Error as SerdeJsonError;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("board {0} not found")]
    BoardNotFound(BoardId),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub trait TaskRepository {
    fn tasks_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Task>>;
}

pub trait DependencyRepository {
    fn dependencies_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Dependency>>;
}

pub trait CapacityRepository {
    fn capacities_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<ResourceCapacity>>;
}

/// Display names for user ids.
pub trait UserDirectory {
    fn usernames(&self) -> RepositoryResult<HashMap<UserId, String>>;
}

/// Everything needed to render a board's Gantt and Workload views.
pub trait BoardRepository:
    TaskRepository + DependencyRepository + CapacityRepository + UserDirectory
{
}

impl<T> BoardRepository for T where
    T: TaskRepository + DependencyRepository + CapacityRepository + UserDirectory + ?Sized
{
}

macro_rules! forward_through_pointer {
    ($($pointer:ident),*) => {
        $(
            impl<T: TaskRepository + ?Sized> TaskRepository for $pointer<T> {
                fn tasks_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Task>> {
                    (**self).tasks_for_board(board_id)
                }
            }

            impl<T: DependencyRepository + ?Sized> DependencyRepository for $pointer<T> {
                fn dependencies_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Dependency>> {
                    (**self).dependencies_for_board(board_id)
                }
            }

            impl<T: CapacityRepository + ?Sized> CapacityRepository for $pointer<T> {
                fn capacities_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<ResourceCapacity>> {
                    (**self).capacities_for_board(board_id)
                }
            }

            impl<T: UserDirectory + ?Sized> UserDirectory for $pointer<T> {
                fn usernames(&self) -> RepositoryResult<HashMap<UserId, String>> {
                    (**self).usernames()
                }
            }
        )*
    };
}

forward_through_pointer!(Box, Arc);

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    BoardSnapshot, User, load_capacities_from_csv, load_dependencies_from_csv,
    load_snapshot_from_json, load_tasks_from_csv, save_snapshot_to_json,
};
pub use memory::MemoryBoardStore;
