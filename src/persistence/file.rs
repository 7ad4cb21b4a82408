use super::{RepositoryError, RepositoryResult};
use crate::dependency::{Dependency, DependencyKind};
use crate::resource::ResourceCapacity;
use crate::schedule::BoardInput;
use crate::task::{Task, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Raw board records exported by the board collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub boards: Vec<BoardInput>,
    #[serde(default)]
    pub capacities: Vec<ResourceCapacity>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl BoardSnapshot {
    pub fn board(&self, board_id: i32) -> Option<&BoardInput> {
        self.boards.iter().find(|b| b.board_id == board_id)
    }

    pub fn validate(&self) -> RepositoryResult<()> {
        let mut board_ids = HashSet::with_capacity(self.boards.len());
        for board in &self.boards {
            if !board_ids.insert(board.board_id) {
                return Err(RepositoryError::InvalidData(format!(
                    "duplicate board id {}",
                    board.board_id
                )));
            }
            // Task ids only need to be unique within their board.
            let mut task_ids = HashSet::with_capacity(board.tasks.len());
            for task in &board.tasks {
                if !task_ids.insert(task.id) {
                    return Err(RepositoryError::InvalidData(format!(
                        "board {} has duplicate task id {}",
                        board.board_id, task.id
                    )));
                }
            }
        }
        for capacity in &self.capacities {
            let hours = capacity.weekly_capacity_hours;
            if !hours.is_finite() || hours < 0.0 {
                return Err(RepositoryError::InvalidData(format!(
                    "user {} has invalid weekly_capacity_hours {}",
                    capacity.user_id, hours
                )));
            }
        }
        Ok(())
    }
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    snapshot: &BoardSnapshot,
    path: P,
) -> RepositoryResult<()> {
    snapshot.validate()?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> RepositoryResult<BoardSnapshot> {
    let file = File::open(path)?;
    let snapshot: BoardSnapshot = serde_json::from_reader(file)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[derive(Debug, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    name: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    estimated_hours: String,
    #[serde(default)]
    assignee_id: String,
}

#[derive(Debug, Deserialize)]
struct DependencyCsvRecord {
    predecessor_id: i32,
    successor_id: i32,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CapacityCsvRecord {
    user_id: i32,
    #[serde(default)]
    weekly_capacity_hours: String,
}

/// Reads `id,name,start_date,end_date,estimated_hours,assignee_id`; empty
/// cells are treated as absent.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> RepositoryResult<Vec<Task>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        tasks.push(Task {
            id: record.id,
            start_date: parse_optional_date(&record.start_date, "start_date", record.id)?,
            end_date: parse_optional_date(&record.end_date, "end_date", record.id)?,
            estimated_hours: parse_optional(&record.estimated_hours, "estimated_hours", record.id)?,
            assignee_id: parse_optional(&record.assignee_id, "assignee_id", record.id)?,
            name: record.name,
        });
    }
    Ok(tasks)
}

/// Reads `predecessor_id,successor_id,type`; an empty type means FS.
pub fn load_dependencies_from_csv<P: AsRef<Path>>(path: P) -> RepositoryResult<Vec<Dependency>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut deps = Vec::new();
    for record in reader.deserialize::<DependencyCsvRecord>() {
        let record = record?;
        let kind: DependencyKind = record
            .kind
            .parse()
            .map_err(|err| RepositoryError::InvalidData(format!("{err}")))?;
        deps.push(Dependency::with_kind(
            record.predecessor_id,
            record.successor_id,
            kind,
        ));
    }
    Ok(deps)
}

/// Reads `user_id,weekly_capacity_hours`; an empty capacity means the default.
pub fn load_capacities_from_csv<P: AsRef<Path>>(
    path: P,
) -> RepositoryResult<Vec<ResourceCapacity>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut capacities = Vec::new();
    for record in reader.deserialize::<CapacityCsvRecord>() {
        let record = record?;
        let hours = parse_optional::<f64>(
            &record.weekly_capacity_hours,
            "weekly_capacity_hours",
            record.user_id,
        )?
        .unwrap_or(crate::config::DEFAULT_WEEKLY_CAPACITY_HOURS);
        capacities.push(ResourceCapacity::new(record.user_id, hours));
    }
    Ok(capacities)
}

fn parse_optional<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    row_id: i32,
) -> RepositoryResult<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<T>().map(Some).map_err(|_| {
        RepositoryError::InvalidData(format!("row {row_id} has invalid {field} '{trimmed}'"))
    })
}

fn parse_optional_date(raw: &str, field: &str, row_id: i32) -> RepositoryResult<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|err| {
            RepositoryError::InvalidData(format!(
                "row {row_id} has invalid {field} '{trimmed}': {err}"
            ))
        })
}
