//! Core scalar types shared by the tree, diff and cache modules.

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Opaque repository identifier used as the cache key, e.g. `"owner/name"`.
pub type RepoKey = String;

/// Path separator used by every remote listing.
pub const PATH_SEPARATOR: char = '/';
