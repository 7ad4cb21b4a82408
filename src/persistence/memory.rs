use super::file::BoardSnapshot;
use super::{
    CapacityRepository, DependencyRepository, RepositoryError, RepositoryResult, TaskRepository,
    UserDirectory,
};
use crate::dependency::Dependency;
use crate::resource::ResourceCapacity;
use crate::schedule::BoardInput;
use crate::task::{BoardId, Task, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Board records held in memory, e.g. loaded from a snapshot file.
///
/// Capacities and users are shared by every board, as in the board module's
/// own tables.
#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    state: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    boards: HashMap<BoardId, BoardInput>,
    capacities: Vec<ResourceCapacity>,
    usernames: HashMap<UserId, String>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let store = Self::new();
        store.replace_snapshot(snapshot);
        store
    }

    /// Swaps in a fresh set of records under one write lock. Each individual
    /// read sees either the old or the new records; separate reads may
    /// straddle a swap.
    pub fn replace_snapshot(&self, snapshot: BoardSnapshot) {
        let next = StoreState {
            boards: snapshot
                .boards
                .into_iter()
                .map(|board| (board.board_id, board))
                .collect(),
            capacities: snapshot.capacities,
            usernames: snapshot
                .users
                .into_iter()
                .map(|user| (user.id, user.username))
                .collect(),
        };
        *self.state.write() = next;
    }

    pub fn put_board(&self, board: BoardInput) {
        self.state.write().boards.insert(board.board_id, board);
    }

    pub fn set_username(&self, user_id: UserId, username: impl Into<String>) {
        self.state.write().usernames.insert(user_id, username.into());
    }

    pub fn board_ids(&self) -> Vec<BoardId> {
        let mut ids: Vec<BoardId> = self.state.read().boards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn with_board<T>(
        &self,
        board_id: BoardId,
        f: impl FnOnce(&StoreState, &BoardInput) -> T,
    ) -> RepositoryResult<T> {
        let state = self.state.read();
        state
            .boards
            .get(&board_id)
            .map(|board| f(&*state, board))
            .ok_or(RepositoryError::BoardNotFound(board_id))
    }
}

impl TaskRepository for MemoryBoardStore {
    fn tasks_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Task>> {
        self.with_board(board_id, |_, board| board.tasks.clone())
    }
}

impl DependencyRepository for MemoryBoardStore {
    fn dependencies_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Dependency>> {
        self.with_board(board_id, |_, board| board.dependencies.clone())
    }
}

impl CapacityRepository for MemoryBoardStore {
    fn capacities_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<ResourceCapacity>> {
        self.with_board(board_id, |state, _| state.capacities.clone())
    }
}

impl UserDirectory for MemoryBoardStore {
    fn usernames(&self) -> RepositoryResult<HashMap<UserId, String>> {
        Ok(self.state.read().usernames.clone())
    }
}
