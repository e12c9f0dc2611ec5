//! Cache entry and timestamp validity

use crate::types::{RepoKey, Timestamp};
use serde::{Deserialize, Serialize};

/// One repository previously observed as too large for an eager listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyLoadCacheEntry {
    pub repo_key: RepoKey,
    pub last_seen_at: Timestamp,
}

impl LazyLoadCacheEntry {
    pub fn new(repo_key: impl Into<RepoKey>, last_seen_at: Timestamp) -> Self {
        Self {
            repo_key: repo_key.into(),
            last_seen_at,
        }
    }
}

/// A stored timestamp counts only when it is non-negative and at most
/// `max_future_skew_ms` ahead of `now`.
pub fn is_plausible_timestamp(ts: Timestamp, now: Timestamp, max_future_skew_ms: i64) -> bool {
    ts >= 0 && ts <= now.saturating_add(max_future_skew_ms.max(0))
}
