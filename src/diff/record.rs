//! Changed-file records as returned by a comparison.

use serde::{Deserialize, Serialize};

/// How a file changed in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Copied => "copied",
            ChangeKind::Changed => "changed",
            ChangeKind::Unchanged => "unchanged",
        }
    }

    /// One-letter marker used by text renderers.
    pub fn marker(&self) -> char {
        match self {
            ChangeKind::Added => 'A',
            ChangeKind::Modified | ChangeKind::Changed => 'M',
            ChangeKind::Removed => 'D',
            ChangeKind::Renamed => 'R',
            ChangeKind::Copied => 'C',
            ChangeKind::Unchanged => ' ',
        }
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(ChangeKind::Added),
            "modified" => Ok(ChangeKind::Modified),
            "removed" | "deleted" => Ok(ChangeKind::Removed),
            "renamed" => Ok(ChangeKind::Renamed),
            "copied" => Ok(ChangeKind::Copied),
            "changed" => Ok(ChangeKind::Changed),
            "unchanged" => Ok(ChangeKind::Unchanged),
            other => Err(format!("Unknown change kind: {}", other)),
        }
    }
}

/// One changed file in a pull/merge request comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub change_kind: ChangeKind,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    /// Path before a rename or copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
    /// Blob id of the new content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, change_kind: ChangeKind, additions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            change_kind,
            additions,
            deletions,
            previous_path: None,
            sha: None,
        }
    }
}
