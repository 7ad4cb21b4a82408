use crate::calculations::{BackwardPass, EarlyTimes, Float, ForwardPass, LateTimes, SlackAnalyzer};
use crate::config::EngineConfig;
use crate::dependency::Dependency;
use crate::error::{EngineResult, ScheduleError};
use crate::graph::{TaskGraph, TaskGraphBuilder, TopologicalScheduler};
use crate::task::{BoardId, Task, TaskId};
use chrono::{Days, NaiveDate};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Computed timing for one task. Offsets are whole days from the anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub id: TaskId,
    pub name: String,
    pub duration_days: i64,
    pub es: i64,
    pub ef: i64,
    pub ls: i64,
    pub lf: i64,
    pub slack: i64,
    pub critical: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSchedule {
    pub project_duration_days: i64,
    pub anchor_date: NaiveDate,
    /// One entry per task, in board order.
    pub tasks: Vec<ScheduleResult>,
    pub topological_order: Vec<TaskId>,
    pub skipped_dependencies: Vec<Dependency>,
}

impl ProjectSchedule {
    pub fn task(&self, id: TaskId) -> Option<&ScheduleResult> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Zero-float tasks in topological order.
    pub fn critical_path(&self) -> Vec<TaskId> {
        self.topological_order
            .iter()
            .copied()
            .filter(|id| self.task(*id).is_some_and(|t| t.critical))
            .collect()
    }

    pub fn critical_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.critical).count()
    }

    pub fn skipped_dependency_count(&self) -> usize {
        self.skipped_dependencies.len()
    }

    /// Latest materialized end date on the board.
    pub fn finish_date(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|t| t.end).max()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.tasks.len(),
            critical_count: self.critical_count(),
            critical_path: self.critical_path(),
            project_duration_days: self.project_duration_days,
            finish_date: self.finish_date(),
            skipped_dependencies: self.skipped_dependency_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<TaskId>,
    pub project_duration_days: i64,
    pub finish_date: Option<NaiveDate>,
    pub skipped_dependencies: usize,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}d", self.project_duration_days));
        if let Some(date) = self.finish_date {
            parts.push(format!("finish={}", date));
        }
        if self.skipped_dependencies > 0 {
            parts.push(format!("skipped_deps={}", self.skipped_dependencies));
        }
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

/// Turns day offsets into calendar dates.
///
/// Explicit task dates always win over computed ones, so pinned items keep
/// their dates while still reporting float.
pub struct ScheduleMaterializer<'a> {
    graph: &'a TaskGraph,
}

impl<'a> ScheduleMaterializer<'a> {
    pub fn new(graph: &'a TaskGraph) -> Self {
        Self { graph }
    }

    pub fn dates_for(
        &self,
        task: &Task,
        early_start: i64,
        duration: i64,
    ) -> EngineResult<(NaiveDate, NaiveDate)> {
        let start = match task.start_date {
            Some(start) => start,
            None => add_days(self.graph.anchor_date(), early_start, task)?,
        };
        let end = match task.end_date {
            Some(end) => end,
            None => add_days(start, duration - 1, task)?,
        };
        Ok((start, end))
    }

    pub fn materialize(
        &self,
        order: &[NodeIndex],
        early: &EarlyTimes,
        late: &LateTimes,
        float: &Float,
    ) -> EngineResult<ProjectSchedule> {
        let durations = self.graph.durations();
        let tasks = self
            .graph
            .graph
            .node_indices()
            .map(|node| {
                let i = node.index();
                let task = self.graph.task_at(node);
                let (start, end) = self.dates_for(task, early.early_start[i], durations[i])?;
                Ok(ScheduleResult {
                    id: task.id,
                    name: task.name.clone(),
                    duration_days: durations[i],
                    es: early.early_start[i],
                    ef: early.early_finish[i],
                    ls: late.late_start[i],
                    lf: late.late_finish[i],
                    slack: float.slack[i],
                    critical: float.critical[i],
                    start,
                    end,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(ProjectSchedule {
            project_duration_days: early.project_duration(),
            anchor_date: self.graph.anchor_date(),
            tasks,
            topological_order: order.iter().map(|node| self.graph.graph[*node]).collect(),
            skipped_dependencies: self.graph.skipped_dependencies().to_vec(),
        })
    }
}

fn add_days(date: NaiveDate, days: i64, task: &Task) -> EngineResult<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or(ScheduleError::DateOutOfRange { task: task.id })
}

/// Runs the whole critical-path pipeline with default settings.
pub fn compute_schedule(tasks: &[Task], dependencies: &[Dependency]) -> EngineResult<ProjectSchedule> {
    compute_schedule_with(tasks, dependencies, &EngineConfig::default())
}

pub fn compute_schedule_with(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &EngineConfig,
) -> EngineResult<ProjectSchedule> {
    let graph = TaskGraphBuilder::new(tasks, dependencies, config.fallback_anchor())
        .dangling_policy(config.dangling_dependencies)
        .build()?;
    schedule_graph(&graph)
}

/// Runs the passes over an already assembled graph.
pub fn schedule_graph(graph: &TaskGraph) -> EngineResult<ProjectSchedule> {
    let order = TopologicalScheduler::new(graph).order()?;
    let early = ForwardPass::new(graph).execute(&order);
    let late = BackwardPass::new(graph).execute(&order, early.project_duration());
    let float = SlackAnalyzer::new(&early, &late).execute();
    let schedule = ScheduleMaterializer::new(graph).materialize(&order, &early, &late, &float)?;
    info!(
        tasks = schedule.tasks.len(),
        critical = float.critical_count(),
        project_duration = schedule.project_duration_days,
        "schedule computed"
    );
    Ok(schedule)
}

/// Raw records of one board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardInput {
    pub board_id: BoardId,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Schedules many boards on the rayon pool. Results keep the input order.
pub fn schedule_boards(
    boards: &[BoardInput],
    config: &EngineConfig,
) -> Vec<(BoardId, EngineResult<ProjectSchedule>)> {
    boards
        .par_iter()
        .map(|board| {
            let result = compute_schedule_with(&board.tasks, &board.dependencies, config);
            (board.board_id, result)
        })
        .collect()
}
