//! In-memory source fed from values or files

use crate::diff::ChangeRecord;
use crate::error::ApiError;
use crate::repo::RepoRef;
use crate::source::{PathListing, TreeSource};
use async_trait::async_trait;
use std::path::Path;

/// Serves a fixed listing and a fixed set of changes for every repository.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    listing: PathListing,
    changes: Vec<ChangeRecord>,
}

impl StaticSource {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            listing: PathListing::complete(paths),
            changes: Vec::new(),
        }
    }

    pub fn truncated(mut self, truncated: bool) -> Self {
        self.listing.truncated = truncated;
        self
    }

    pub fn with_changes(mut self, changes: Vec<ChangeRecord>) -> Self {
        self.changes = changes;
        self
    }

    /// One path per line; blank lines are skipped, other lines kept verbatim.
    pub fn from_path_file(path: &Path) -> Result<Self, ApiError> {
        let text = read_input(path)?;
        let paths = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect();
        Ok(Self::new(paths))
    }

    /// JSON array of change records.
    pub fn from_changes_file(path: &Path) -> Result<Self, ApiError> {
        let text = read_input(path)?;
        let changes: Vec<ChangeRecord> = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidInput(format!("Invalid change file {}: {}", path.display(), e))
        })?;
        Ok(Self::default().with_changes(changes))
    }
}

fn read_input(path: &Path) -> Result<String, ApiError> {
    std::fs::read_to_string(path)
        .map_err(|e| ApiError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))
}

#[async_trait]
impl TreeSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn list_paths(&self, _repo: &RepoRef) -> Result<PathListing, ApiError> {
        Ok(self.listing.clone())
    }

    async fn list_changes(
        &self,
        _repo: &RepoRef,
        _pull_number: u64,
    ) -> Result<Vec<ChangeRecord>, ApiError> {
        Ok(self.changes.clone())
    }
}
