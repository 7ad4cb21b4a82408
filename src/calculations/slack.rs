use super::backward_pass::LateTimes;
use super::forward_pass::EarlyTimes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Float {
    pub slack: Vec<i64>,
    pub critical: Vec<bool>,
}

impl Float {
    pub fn critical_count(&self) -> usize {
        self.critical.iter().filter(|c| **c).count()
    }
}

pub struct SlackAnalyzer<'a> {
    early: &'a EarlyTimes,
    late: &'a LateTimes,
}

impl<'a> SlackAnalyzer<'a> {
    pub fn new(early: &'a EarlyTimes, late: &'a LateTimes) -> Self {
        Self { early, late }
    }

    /// Total float per node; zero float marks the critical path.
    pub fn execute(&self) -> Float {
        let slack: Vec<i64> = self
            .late
            .late_start
            .iter()
            .zip(&self.early.early_start)
            .map(|(ls, es)| ls - es)
            .collect();
        let critical = slack.iter().map(|s| *s == 0).collect();
        Float { slack, critical }
    }
}
