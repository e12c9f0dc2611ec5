//! Fetch collaborators
//!
//! A [`TreeSource`] produces the flat inputs the builders work on: a path
//! listing for a repository and the changed-file records of a pull request.

pub mod github;
pub mod local;
pub mod static_listing;

use crate::diff::ChangeRecord;
use crate::error::ApiError;
use crate::repo::RepoRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use github::GithubSource;
pub use local::LocalSource;
pub use static_listing::StaticSource;

/// Flat listing of file paths, possibly cut short by the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathListing {
    pub paths: Vec<String>,
    /// The remote returned only part of the tree
    #[serde(default)]
    pub truncated: bool,
}

impl PathListing {
    pub fn complete(paths: Vec<String>) -> Self {
        Self {
            paths,
            truncated: false,
        }
    }
}

#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    async fn list_paths(&self, repo: &RepoRef) -> Result<PathListing, ApiError>;

    async fn list_changes(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<ChangeRecord>, ApiError>;
}
