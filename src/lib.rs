//! Sidetree: file-browser trees from flat source-control listings
//!
//! Builds hierarchical, display-ordered trees from flat path listings and
//! from pull-request change records (with per-directory change totals), and
//! decides per repository whether a tree should load eagerly or lazily,
//! remembering large repositories in a bounded, persisted cache.

pub mod cache;
pub mod clock;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod repo;
pub mod service;
pub mod settings;
pub mod source;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use cache::{CachePolicy, LazyLoadCache, LazyLoadCacheEntry};
pub use diff::{ChangeKind, ChangeRecord, DiffTreeBuilder, DiffTreeNode};
pub use error::{ApiError, StorageError};
pub use repo::RepoRef;
pub use service::{DecisionReason, LoadDecision, TreeLoad, TreeService};
pub use tree::{PathTreeBuilder, TreeNode, TreeSorter};
