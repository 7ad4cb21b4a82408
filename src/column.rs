use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board column types known to the presentation layer.
///
/// The scheduling engine does not read columns; `Timeline`, `Date` and
/// `Dependency` columns are where its output is usually shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Timeline,
    People,
    Status,
    Dropdown,
    Formula,
    TimeTracking,
    Dependency,
    Location,
    File,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 12] = [
        ColumnKind::Text,
        ColumnKind::Number,
        ColumnKind::Date,
        ColumnKind::Timeline,
        ColumnKind::People,
        ColumnKind::Status,
        ColumnKind::Dropdown,
        ColumnKind::Formula,
        ColumnKind::TimeTracking,
        ColumnKind::Dependency,
        ColumnKind::Location,
        ColumnKind::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Timeline => "timeline",
            ColumnKind::People => "people",
            ColumnKind::Status => "status",
            ColumnKind::Dropdown => "dropdown",
            ColumnKind::Formula => "formula",
            ColumnKind::TimeTracking => "time_tracking",
            ColumnKind::Dependency => "dependency",
            ColumnKind::Location => "location",
            ColumnKind::File => "file",
        }
    }

    /// Columns whose values come from, or feed, the schedule.
    pub fn is_schedule_related(&self) -> bool {
        matches!(
            self,
            ColumnKind::Date | ColumnKind::Timeline | ColumnKind::Dependency
        )
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ColumnKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown column type '{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_agree() {
        for kind in ColumnKind::ALL {
            assert_eq!(kind.as_str().parse::<ColumnKind>(), Ok(kind));
        }
        assert!("kanban".parse::<ColumnKind>().is_err());
    }

    #[test]
    fn serde_matches_stored_type_names() {
        let json = serde_json::to_string(&ColumnKind::TimeTracking).unwrap();
        assert_eq!(json, "\"time_tracking\"");
        assert!(ColumnKind::Timeline.is_schedule_related());
        assert!(!ColumnKind::People.is_schedule_related());
    }
}
