use super::file::BoardSnapshot;
use super::{
    CapacityRepository, DependencyRepository, RepositoryError, RepositoryResult, TaskRepository,
    UserDirectory,
};
use crate::config::DEFAULT_WEEKLY_CAPACITY_HOURS;
use crate::dependency::{Dependency, DependencyKind};
use crate::resource::ResourceCapacity;
use crate::task::{BoardId, Task, UserId};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use tracing::debug;

/// Board tables in a SQLite file, laid out like the board module's own
/// `pm_*` tables. Task ids and dependency pairs are keyed per board.
pub struct SqliteBoardStore {
    connection: Mutex<Connection>,
}

impl SqliteBoardStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> RepositoryResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> RepositoryResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> RepositoryResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS pm_boards (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS pm_items (
                id INTEGER NOT NULL,
                board_id INTEGER NOT NULL REFERENCES pm_boards(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                start_date TEXT,
                end_date TEXT,
                assignee_id INTEGER,
                position INTEGER DEFAULT 0,
                estimated_hours REAL,
                PRIMARY KEY (board_id, id)
            );
            CREATE TABLE IF NOT EXISTS pm_dependencies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                board_id INTEGER NOT NULL REFERENCES pm_boards(id) ON DELETE CASCADE,
                predecessor_id INTEGER NOT NULL,
                successor_id INTEGER NOT NULL,
                type TEXT DEFAULT 'FS',
                UNIQUE (board_id, predecessor_id, successor_id)
            );
            CREATE TABLE IF NOT EXISTS pm_user_capacity (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                weekly_capacity_hours REAL DEFAULT 40
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    pub fn insert_board(&self, board_id: BoardId, name: &str) -> RepositoryResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT OR REPLACE INTO pm_boards (id, name) VALUES (?1, ?2)",
            params![board_id, name],
        )?;
        Ok(())
    }

    pub fn insert_task(&self, board_id: BoardId, task: &Task) -> RepositoryResult<()> {
        let conn = self.connection.lock();
        Self::insert_task_with(&conn, board_id, task)
    }

    pub fn insert_dependency(&self, board_id: BoardId, dep: &Dependency) -> RepositoryResult<()> {
        let conn = self.connection.lock();
        Self::insert_dependency_with(&conn, board_id, dep)
    }

    pub fn upsert_capacity(&self, capacity: &ResourceCapacity) -> RepositoryResult<()> {
        let conn = self.connection.lock();
        Self::upsert_capacity_with(&conn, capacity)
    }

    pub fn insert_user(&self, user_id: UserId, username: &str) -> RepositoryResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT OR REPLACE INTO users (id, username) VALUES (?1, ?2)",
            params![user_id, username],
        )?;
        Ok(())
    }

    /// Loads every record of a snapshot in one transaction.
    pub fn import_snapshot(&self, snapshot: &BoardSnapshot) -> RepositoryResult<()> {
        snapshot.validate()?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        for user in &snapshot.users {
            tx.execute(
                "INSERT OR REPLACE INTO users (id, username) VALUES (?1, ?2)",
                params![user.id, user.username],
            )?;
        }
        for board in &snapshot.boards {
            tx.execute(
                "INSERT OR REPLACE INTO pm_boards (id, name) VALUES (?1, ?2)",
                params![board.board_id, format!("Board {}", board.board_id)],
            )?;
            for task in &board.tasks {
                Self::insert_task_with(&tx, board.board_id, task)?;
            }
            for dep in &board.dependencies {
                Self::insert_dependency_with(&tx, board.board_id, dep)?;
            }
        }
        for capacity in &snapshot.capacities {
            Self::upsert_capacity_with(&tx, capacity)?;
        }
        tx.commit()?;
        debug!(boards = snapshot.boards.len(), "imported board snapshot");
        Ok(())
    }

    fn insert_task_with(conn: &Connection, board_id: BoardId, task: &Task) -> RepositoryResult<()> {
        conn.execute(
            "INSERT INTO pm_items (id, board_id, name, start_date, end_date, assignee_id, position, estimated_hours)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6,
                     (SELECT COALESCE(MAX(position), 0) + 1 FROM pm_items WHERE board_id = ?2), ?7)",
            params![
                task.id,
                board_id,
                task.name,
                task.start_date,
                task.end_date,
                task.assignee_id,
                task.estimated_hours
            ],
        )?;
        Ok(())
    }

    fn insert_dependency_with(
        conn: &Connection,
        board_id: BoardId,
        dep: &Dependency,
    ) -> RepositoryResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO pm_dependencies (board_id, predecessor_id, successor_id, type)
             VALUES (?1, ?2, ?3, ?4)",
            params![board_id, dep.predecessor_id, dep.successor_id, dep.kind.as_str()],
        )?;
        Ok(())
    }

    fn upsert_capacity_with(conn: &Connection, capacity: &ResourceCapacity) -> RepositoryResult<()> {
        conn.execute(
            "INSERT INTO pm_user_capacity (user_id, weekly_capacity_hours) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET weekly_capacity_hours = excluded.weekly_capacity_hours",
            params![capacity.user_id, capacity.weekly_capacity_hours],
        )?;
        Ok(())
    }

    fn ensure_board(conn: &Connection, board_id: BoardId) -> RepositoryResult<()> {
        let found: Option<i32> = conn
            .query_row(
                "SELECT id FROM pm_boards WHERE id = ?1",
                params![board_id],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(RepositoryError::BoardNotFound(board_id)),
        }
    }
}

impl TaskRepository for SqliteBoardStore {
    fn tasks_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Task>> {
        let conn = self.connection.lock();
        Self::ensure_board(&conn, board_id)?;
        let mut stmt = conn.prepare(
            "SELECT id, name, start_date, end_date, estimated_hours, assignee_id
             FROM pm_items WHERE board_id = ?1 ORDER BY position ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![board_id], |row| {
            Ok(Task {
                id: row.get(0)?,
                name: row.get(1)?,
                start_date: row.get(2)?,
                end_date: row.get(3)?,
                estimated_hours: row.get(4)?,
                assignee_id: row.get(5)?,
            })
        })?;
        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }
}

impl DependencyRepository for SqliteBoardStore {
    fn dependencies_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<Dependency>> {
        let conn = self.connection.lock();
        Self::ensure_board(&conn, board_id)?;
        let mut stmt = conn.prepare(
            "SELECT predecessor_id, successor_id, type FROM pm_dependencies
             WHERE board_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![board_id], |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        let mut deps = Vec::new();
        for row in rows {
            let (predecessor, successor, kind) = row?;
            let kind: DependencyKind = kind
                .as_deref()
                .unwrap_or_default()
                .parse()
                .map_err(|err| RepositoryError::InvalidData(format!("{err}")))?;
            deps.push(Dependency::with_kind(predecessor, successor, kind));
        }
        Ok(deps)
    }
}

impl CapacityRepository for SqliteBoardStore {
    // Capacity rows are per user, not per board.
    fn capacities_for_board(&self, board_id: BoardId) -> RepositoryResult<Vec<ResourceCapacity>> {
        let conn = self.connection.lock();
        Self::ensure_board(&conn, board_id)?;
        let mut stmt = conn.prepare(
            "SELECT user_id, weekly_capacity_hours FROM pm_user_capacity ORDER BY user_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let hours: Option<f64> = row.get(1)?;
            Ok(ResourceCapacity::new(
                row.get(0)?,
                hours.unwrap_or(DEFAULT_WEEKLY_CAPACITY_HOURS),
            ))
        })?;
        let mut capacities = Vec::new();
        for capacity in rows {
            capacities.push(capacity?);
        }
        Ok(capacities)
    }
}

impl UserDirectory for SqliteBoardStore {
    fn usernames(&self) -> RepositoryResult<HashMap<UserId, String>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT id, username FROM users")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?)))?;
        let mut names = HashMap::new();
        for row in rows {
            let (id, name) = row?;
            names.insert(id, name);
        }
        Ok(names)
    }
}
