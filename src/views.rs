//! Payloads handed to the presentation layer.

use crate::resource::WorkloadRow;
use crate::schedule::ProjectSchedule;
use crate::task::TaskId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttTask {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub critical: bool,
    pub es: i64,
    pub ef: i64,
    pub ls: i64,
    pub lf: i64,
    pub slack: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttView {
    pub project_duration_days: i64,
    pub anchor_date: NaiveDate,
    pub critical_path: Vec<TaskId>,
    pub skipped_dependencies: usize,
    pub tasks: Vec<GanttTask>,
}

impl From<&ProjectSchedule> for GanttView {
    fn from(schedule: &ProjectSchedule) -> Self {
        let tasks = schedule
            .tasks
            .iter()
            .map(|t| GanttTask {
                id: t.id,
                name: t.name.clone(),
                start: t.start,
                end: t.end,
                critical: t.critical,
                es: t.es,
                ef: t.ef,
                ls: t.ls,
                lf: t.lf,
                slack: t.slack,
            })
            .collect();
        Self {
            project_duration_days: schedule.project_duration_days,
            anchor_date: schedule.anchor_date,
            critical_path: schedule.critical_path(),
            skipped_dependencies: schedule.skipped_dependency_count(),
            tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadView {
    pub rows: Vec<WorkloadRow>,
}

impl WorkloadView {
    /// Rounds hours and utilization for display. Row order and the
    /// overallocation flag come from the unrounded values.
    pub fn new(rows: Vec<WorkloadRow>, precision: u32) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.assigned_hours = round_to(row.assigned_hours, precision);
                row.utilization = round_to(row.utilization, precision);
                row
            })
            .collect();
        Self { rows }
    }

    pub fn overallocated(&self) -> impl Iterator<Item = &WorkloadRow> {
        self.rows.iter().filter(|r| r.overallocated)
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor).round() / factor
}
