//! Diff tree node types

use crate::diff::record::ChangeKind;
use crate::tree::node::{IconHint, NodeKind, TreePath};
use crate::tree::path::name_of;
use serde::{Deserialize, Serialize};

/// Kind-specific part of a diff node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffEntry {
    /// A changed file, mirrored from its record
    File {
        change_kind: ChangeKind,
        /// Position of the record in the comparison
        diff_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sha: Option<String>,
    },
    /// A synthetic ancestor directory
    Directory { files_changed: u64 },
}

/// A node of a diff tree: file or synthetic directory, with change counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffTreeNode {
    pub path: String,
    pub name: String,
    pub icon: IconHint,
    pub additions: u64,
    pub deletions: u64,
    #[serde(flatten)]
    pub entry: DiffEntry,
}

impl DiffTreeNode {
    pub(crate) fn new(path: String, additions: u64, deletions: u64, entry: DiffEntry) -> Self {
        let kind = match entry {
            DiffEntry::File { .. } => NodeKind::File,
            DiffEntry::Directory { .. } => NodeKind::Directory,
        };
        Self {
            name: name_of(&path).to_string(),
            icon: IconHint::for_path(kind, &path),
            path,
            additions,
            deletions,
            entry,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.entry {
            DiffEntry::File { .. } => NodeKind::File,
            DiffEntry::Directory { .. } => NodeKind::Directory,
        }
    }

    /// Change kind of a file node; directories have none.
    pub fn change_kind(&self) -> Option<ChangeKind> {
        match self.entry {
            DiffEntry::File { change_kind, .. } => Some(change_kind),
            DiffEntry::Directory { .. } => None,
        }
    }

    /// Number of changed descendants of a directory node; files have none.
    pub fn files_changed(&self) -> Option<u64> {
        match self.entry {
            DiffEntry::File { .. } => None,
            DiffEntry::Directory { files_changed } => Some(files_changed),
        }
    }
}

impl TreePath for DiffTreeNode {
    fn tree_path(&self) -> &str {
        &self.path
    }
}
