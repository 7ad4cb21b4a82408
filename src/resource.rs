use crate::config::{DEFAULT_WEEKLY_CAPACITY_HOURS, EngineConfig};
use crate::task::{Task, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

fn default_capacity() -> f64 {
    DEFAULT_WEEKLY_CAPACITY_HOURS
}

/// Weekly hours a person can take on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCapacity {
    pub user_id: UserId,
    #[serde(default = "default_capacity")]
    pub weekly_capacity_hours: f64,
}

impl ResourceCapacity {
    pub fn new(user_id: UserId, weekly_capacity_hours: f64) -> Self {
        Self {
            user_id,
            weekly_capacity_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRow {
    pub user_id: UserId,
    pub username: String,
    pub assigned_hours: f64,
    pub weekly_capacity_hours: f64,
    pub utilization: f64,
    pub overallocated: bool,
}

impl WorkloadRow {
    fn new(user_id: UserId, username: String, assigned_hours: f64, capacity: f64) -> Self {
        // Zero (or unusable) capacity reads as idle rather than dividing by zero.
        let utilization = if capacity > 0.0 {
            assigned_hours / capacity
        } else {
            0.0
        };
        Self {
            user_id,
            username,
            assigned_hours,
            weekly_capacity_hours: capacity,
            utilization,
            overallocated: utilization > 1.0,
        }
    }

    /// Headroom left this week; negative when overallocated.
    pub fn remaining_hours(&self) -> f64 {
        self.weekly_capacity_hours - self.assigned_hours
    }
}

/// Sums assigned effort per person and compares it to weekly capacity.
pub struct CapacityPlanner<'a> {
    tasks: &'a [Task],
    capacities: &'a [ResourceCapacity],
    usernames: Option<&'a HashMap<UserId, String>>,
    default_capacity: f64,
}

impl<'a> CapacityPlanner<'a> {
    pub fn new(tasks: &'a [Task], capacities: &'a [ResourceCapacity]) -> Self {
        Self {
            tasks,
            capacities,
            usernames: None,
            default_capacity: DEFAULT_WEEKLY_CAPACITY_HOURS,
        }
    }

    pub fn with_usernames(mut self, usernames: &'a HashMap<UserId, String>) -> Self {
        self.usernames = Some(usernames);
        self
    }

    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.default_capacity = config.default_weekly_capacity_hours;
        self
    }

    pub fn assigned_hours(&self) -> BTreeMap<UserId, f64> {
        let mut hours: BTreeMap<UserId, f64> = BTreeMap::new();
        for task in self.tasks {
            let Some(user_id) = task.assignee_id else {
                continue;
            };
            if let Some(raw) = task.estimated_hours {
                if !raw.is_finite() || raw < 0.0 {
                    warn!(task = task.id, hours = raw, "ignoring unusable estimated hours");
                }
            }
            *hours.entry(user_id).or_default() += task.effort_hours();
        }
        hours
    }

    /// One row per assignee or capacity entry, busiest first.
    pub fn execute(&self) -> Vec<WorkloadRow> {
        let assigned = self.assigned_hours();
        // Later rows for the same user win, like a keyed table load.
        let capacity: HashMap<UserId, f64> = self
            .capacities
            .iter()
            .map(|c| (c.user_id, c.weekly_capacity_hours))
            .collect();

        let mut users: Vec<UserId> = assigned.keys().copied().collect();
        users.extend(capacity.keys().filter(|id| !assigned.contains_key(id)));

        let mut rows: Vec<WorkloadRow> = users
            .into_iter()
            .map(|user_id| {
                let hours = assigned.get(&user_id).copied().unwrap_or(0.0);
                let cap = capacity.get(&user_id).copied().unwrap_or(self.default_capacity);
                WorkloadRow::new(user_id, self.display_name(user_id), hours, cap)
            })
            .collect();

        rows.sort_by(|a, b| {
            b.utilization
                .partial_cmp(&a.utilization)
                .unwrap_or(Ordering::Equal)
                .then(a.user_id.cmp(&b.user_id))
        });

        debug!(
            users = rows.len(),
            overallocated = rows.iter().filter(|r| r.overallocated).count(),
            "workload computed"
        );
        rows
    }

    fn display_name(&self, user_id: UserId) -> String {
        self.usernames
            .and_then(|names| names.get(&user_id))
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    }
}

/// Workload with default capacity and ids as display names.
pub fn compute_workload(tasks: &[Task], capacities: &[ResourceCapacity]) -> Vec<WorkloadRow> {
    CapacityPlanner::new(tasks, capacities).execute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_means_zero_utilization() {
        let tasks = vec![Task::new(1, "a").with_estimate(8.0).assigned_to(5)];
        let rows = compute_workload(&tasks, &[ResourceCapacity::new(5, 0.0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].utilization, 0.0);
        assert!(!rows[0].overallocated);
        assert_eq!(rows[0].assigned_hours, 8.0);
    }

    #[test]
    fn unassigned_tasks_are_ignored() {
        let tasks = vec![Task::new(1, "a").with_estimate(8.0), Task::new(2, "b").assigned_to(1)];
        let rows = compute_workload(&tasks, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, 1);
        assert_eq!(rows[0].assigned_hours, 0.0);
        assert_eq!(rows[0].weekly_capacity_hours, 40.0);
    }

    #[test]
    fn ties_sort_by_user_id() {
        let caps = vec![
            ResourceCapacity::new(9, 40.0),
            ResourceCapacity::new(3, 40.0),
            ResourceCapacity::new(6, 10.0),
        ];
        let tasks = vec![Task::new(1, "a").with_estimate(5.0).assigned_to(6)];
        let rows = compute_workload(&tasks, &caps);
        let order: Vec<_> = rows.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![6, 3, 9]);
    }

    #[test]
    fn configured_default_and_usernames_apply() {
        let tasks = vec![Task::new(1, "a").with_estimate(30.0).assigned_to(2)];
        let names = HashMap::from([(2, "dana".to_string())]);
        let mut config = EngineConfig::default();
        config.default_weekly_capacity_hours = 20.0;
        let rows = CapacityPlanner::new(&tasks, &[])
            .with_usernames(&names)
            .with_config(&config)
            .execute();
        assert_eq!(rows[0].username, "dana");
        assert_eq!(rows[0].weekly_capacity_hours, 20.0);
        assert!(rows[0].overallocated);
        assert_eq!(rows[0].remaining_hours(), -10.0);
    }

    #[test]
    fn capacity_row_defaults_hours_when_missing() {
        let cap: ResourceCapacity = serde_json::from_str(r#"{"user_id": 4}"#).unwrap();
        assert_eq!(cap.weekly_capacity_hours, 40.0);
    }
}
