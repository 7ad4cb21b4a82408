use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Link type between two board items.
///
/// Every kind is accepted and stored, but the passes only apply
/// finish-to-start timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyKind {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dependency type '{0}' (expected FS, SS, FF or SF)")]
pub struct UnknownDependencyKind(pub String);

impl FromStr for DependencyKind {
    type Err = UnknownDependencyKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "FS" => Ok(DependencyKind::FinishToStart),
            "SS" => Ok(DependencyKind::StartToStart),
            "FF" => Ok(DependencyKind::FinishToFinish),
            "SF" => Ok(DependencyKind::StartToFinish),
            _ => Err(UnknownDependencyKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub predecessor_id: TaskId,
    pub successor_id: TaskId,
    #[serde(rename = "type", default)]
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(predecessor_id: TaskId, successor_id: TaskId) -> Self {
        Self::with_kind(predecessor_id, successor_id, DependencyKind::FinishToStart)
    }

    pub fn with_kind(predecessor_id: TaskId, successor_id: TaskId, kind: DependencyKind) -> Self {
        Self {
            predecessor_id,
            successor_id,
            kind,
        }
    }
}
