//! Diff aggregation
//!
//! Turns the changed-file records of a comparison into the same tree shape
//! as [`crate::tree`], with addition/deletion counts rolled up into every
//! ancestor directory.

pub mod builder;
pub mod node;
pub mod record;

pub use builder::DiffTreeBuilder;
pub use node::{DiffEntry, DiffTreeNode};
pub use record::{ChangeKind, ChangeRecord};
