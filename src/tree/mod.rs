//! Tree synthesis
//!
//! Turns flat path listings into file and directory nodes and orders them
//! for display.

pub mod builder;
pub mod node;
pub mod path;
pub mod sort;

pub use builder::PathTreeBuilder;
pub use node::{IconHint, NodeKind, TreeNode, TreePath};
pub use sort::{SortKey, TreeSorter};
