//! Listing of a checkout on local disk

use crate::config::LocalConfig;
use crate::diff::ChangeRecord;
use crate::error::ApiError;
use crate::repo::RepoRef;
use crate::source::{PathListing, TreeSource};
use crate::types::PATH_SEPARATOR;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Lists files under a directory. The repository reference only labels the
/// listing; `root` is always what gets walked.
pub struct LocalSource {
    root: PathBuf,
    max_entries: usize,
    include_hidden: bool,
}

impl LocalSource {
    pub fn new(root: &Path, config: &LocalConfig) -> Result<Self, ApiError> {
        let root = dunce::canonicalize(root).map_err(|e| {
            ApiError::InvalidInput(format!("Cannot open {}: {}", root.display(), e))
        })?;
        if !root.is_dir() {
            return Err(ApiError::InvalidInput(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root,
            max_entries: config.max_entries,
            include_hidden: config.include_hidden,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// `/`-joined, NFC-normalized form of a relative path.
fn to_listing_path(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            if !out.is_empty() {
                out.push(PATH_SEPARATOR);
            }
            out.extend(segment.to_string_lossy().nfc());
        }
    }
    out
}

fn walk(root: &Path, max_entries: usize, include_hidden: bool) -> Result<PathListing, ApiError> {
    let mut listing = PathListing::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            name != ".git" && (include_hidden || !name.starts_with('.'))
        });

    for entry in walker {
        let entry = entry.map_err(|e| ApiError::FetchError {
            repo: root.display().to_string(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        if max_entries > 0 && listing.paths.len() >= max_entries {
            listing.truncated = true;
            break;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        listing.paths.push(to_listing_path(relative));
    }
    Ok(listing)
}

#[async_trait]
impl TreeSource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_paths(&self, repo: &RepoRef) -> Result<PathListing, ApiError> {
        let root = self.root.clone();
        let max_entries = self.max_entries;
        let include_hidden = self.include_hidden;
        let listing = tokio::task::spawn_blocking(move || walk(&root, max_entries, include_hidden))
            .await
            .map_err(|e| ApiError::FetchError {
                repo: repo.key(),
                message: format!("Directory walk panicked: {}", e),
            })??;
        tracing::info!(
            repo = %repo,
            root = %self.root.display(),
            paths = listing.paths.len(),
            truncated = listing.truncated,
            "Listed local checkout"
        );
        Ok(listing)
    }

    async fn list_changes(
        &self,
        _repo: &RepoRef,
        _pull_number: u64,
    ) -> Result<Vec<ChangeRecord>, ApiError> {
        Err(ApiError::Unsupported {
            source_name: "local",
            operation: "list_changes",
        })
    }
}
