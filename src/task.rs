use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = i32;
pub type UserId = i32;
pub type BoardId = i32;

/// A board item as supplied by the board collaborator.
///
/// Only the fields the scheduling and capacity pipelines read are carried
/// here; everything else about an item (status, position, column values)
/// stays with the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            start_date: None,
            end_date: None,
            estimated_hours: None,
            assignee_id: None,
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assignee_id = Some(user_id);
        self
    }

    /// Duration in whole days, never less than one.
    ///
    /// Both explicit dates with `end >= start` give an inclusive day count;
    /// any other combination falls back to a single day.
    pub fn duration_days(&self) -> i64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => (end - start).num_days() + 1,
            _ => 1,
        }
    }

    /// Estimated effort with absent or unusable values read as zero.
    pub fn effort_hours(&self) -> f64 {
        match self.estimated_hours {
            Some(hours) if hours.is_finite() && hours > 0.0 => hours,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn duration_counts_both_endpoints() {
        let task = Task::new(1, "Pour slab").with_dates(d(2025, 3, 3), d(2025, 3, 7));
        assert_eq!(task.duration_days(), 5);
    }

    #[test]
    fn single_day_when_dates_coincide() {
        let task = Task::new(1, "Inspect").with_dates(d(2025, 3, 3), d(2025, 3, 3));
        assert_eq!(task.duration_days(), 1);
    }

    #[test]
    fn duration_defaults_to_one_day() {
        assert_eq!(Task::new(1, "No dates").duration_days(), 1);
        assert_eq!(Task::new(2, "Start only").with_start(d(2025, 1, 1)).duration_days(), 1);
        assert_eq!(Task::new(3, "End only").with_end(d(2025, 1, 1)).duration_days(), 1);
        let inverted = Task::new(4, "Inverted").with_dates(d(2025, 1, 10), d(2025, 1, 2));
        assert_eq!(inverted.duration_days(), 1);
    }

    #[test]
    fn effort_ignores_missing_and_negative_hours() {
        assert_eq!(Task::new(1, "a").effort_hours(), 0.0);
        assert_eq!(Task::new(1, "a").with_estimate(-3.0).effort_hours(), 0.0);
        assert_eq!(Task::new(1, "a").with_estimate(f64::NAN).effort_hours(), 0.0);
        assert_eq!(Task::new(1, "a").with_estimate(12.5).effort_hours(), 12.5);
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let task: Task = serde_json::from_str(r#"{"id": 7, "name": "Frame walls"}"#).unwrap();
        assert_eq!(task, Task::new(7, "Frame walls"));

        let task: Task = serde_json::from_str(
            r#"{"id": 8, "name": "Roof", "start_date": "2025-04-01", "end_date": "2025-04-03", "estimated_hours": 16, "assignee_id": 3}"#,
        )
        .unwrap();
        assert_eq!(task.duration_days(), 3);
        assert_eq!(task.assignee_id, Some(3));
    }
}
