//! Tree loading orchestration
//!
//! Fetches a listing from a [`TreeSource`], runs the matching builder, sorts
//! the result, and feeds truncation back into the [`LazyLoadCache`].

use crate::cache::{CachePolicy, LazyLoadCache};
use crate::clock::Clock;
use crate::diff::{DiffTreeBuilder, DiffTreeNode};
use crate::error::ApiError;
use crate::repo::RepoRef;
use crate::settings::Settings;
use crate::source::TreeSource;
use crate::store::KeyValueStore;
use crate::tree::{PathTreeBuilder, TreeNode, TreeSorter};
use serde::Serialize;
use std::sync::Arc;

/// Sorted tree for one repository
#[derive(Debug, Clone, Serialize)]
pub struct TreeLoad {
    pub repo: RepoRef,
    pub nodes: Vec<TreeNode>,
    /// The listing was incomplete; `nodes` covers only what was returned
    pub truncated: bool,
}

/// Sorted diff tree for one pull request
#[derive(Debug, Clone, Serialize)]
pub struct DiffLoad {
    pub repo: RepoRef,
    pub pull_number: u64,
    pub nodes: Vec<DiffTreeNode>,
}

/// Why a repository loads eagerly or lazily
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    PullRequest,
    GlobalSetting,
    KnownLarge,
    NotObserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadDecision {
    pub lazy: bool,
    pub reason: DecisionReason,
}

pub struct TreeService {
    source: Arc<dyn TreeSource>,
    store: Arc<dyn KeyValueStore>,
    cache: LazyLoadCache,
    settings: Settings,
    clock: Arc<dyn Clock>,
}

impl TreeService {
    pub fn new(
        source: Arc<dyn TreeSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache: LazyLoadCache::new(store.clone(), clock.clone(), policy),
            settings: Settings::new(store.clone()),
            source,
            store,
            clock,
        }
    }

    pub fn cache(&self) -> &LazyLoadCache {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A pull request view with pull-request mode enabled
    pub fn is_pr_context(&self, repo: &RepoRef) -> bool {
        repo.pull_number.is_some() && self.settings.pr_mode()
    }

    /// Eager/lazy decision for `repo`. A decision made because the
    /// repository is a known large one refreshes its cache entry.
    pub fn decide(&self, repo: &RepoRef) -> LoadDecision {
        let key = repo.key();
        let is_pr_context = self.is_pr_context(repo);
        let global_lazy_load = self.settings.lazy_load();
        let lazy = self
            .cache
            .should_lazy_load(&key, global_lazy_load, is_pr_context);

        let reason = if is_pr_context {
            DecisionReason::PullRequest
        } else if global_lazy_load {
            DecisionReason::GlobalSetting
        } else if lazy {
            DecisionReason::KnownLarge
        } else {
            DecisionReason::NotObserved
        };
        if reason == DecisionReason::KnownLarge {
            self.cache.touch(&key, self.clock.now_ms());
        }

        tracing::debug!(repo = %repo, lazy, ?reason, "Load decision");
        LoadDecision { lazy, reason }
    }

    pub fn should_lazy_load(&self, repo: &RepoRef) -> bool {
        self.decide(repo).lazy
    }

    pub fn should_load_entire_tree(&self, repo: &RepoRef) -> bool {
        !self.should_lazy_load(repo)
    }

    /// Fetch, synthesize and sort the full tree of `repo`.
    ///
    /// A truncated listing is not an error: the partial tree is returned and
    /// the repository is remembered as large.
    pub async fn load_tree(&self, repo: &RepoRef) -> Result<TreeLoad, ApiError> {
        let listing = self.source.list_paths(repo).await?;
        if listing.truncated {
            tracing::warn!(
                repo = %repo,
                source = self.source.name(),
                paths = listing.paths.len(),
                "Listing truncated, remembering repository as large"
            );
            self.cache.record_large(&repo.key(), self.clock.now_ms());
        }

        let nodes = TreeSorter::sort(PathTreeBuilder::synthesize(&listing.paths));
        Ok(TreeLoad {
            repo: repo.clone(),
            nodes,
            truncated: listing.truncated,
        })
    }

    /// Fetch, aggregate and sort the changed files of one pull request.
    pub async fn load_diff(&self, repo: &RepoRef, pull_number: u64) -> Result<DiffLoad, ApiError> {
        let records = self.source.list_changes(repo, pull_number).await?;
        let nodes = TreeSorter::sort(DiffTreeBuilder::synthesize_from_diff(records));
        Ok(DiffLoad {
            repo: repo.clone(),
            pull_number,
            nodes,
        })
    }

    /// [`Self::load_diff`] for the pull request carried by `repo`.
    pub async fn load_pull_request(&self, repo: &RepoRef) -> Result<DiffLoad, ApiError> {
        let pull_number = repo.pull_number.ok_or_else(|| {
            ApiError::InvalidInput(format!("{} does not name a pull request", repo))
        })?;
        self.load_diff(repo, pull_number).await
    }

    /// Flush the backing store.
    pub fn shutdown(&self) -> Result<(), ApiError> {
        self.store.flush()?;
        tracing::debug!("Tree service shut down");
        Ok(())
    }
}
