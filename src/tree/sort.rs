//! Display ordering for synthesized trees
//!
//! Three passes are applied in turn, each one refining the last, so the
//! final pass has the highest priority:
//!
//! 1. first character of the path, ascending; an empty path sorts first
//! 2. within one first character, longer paths (in characters) first
//! 3. dotfiles (path starts with `.`) ahead of everything else
//!
//! The passes collapse into one composed key compared field by field. Only
//! the first character takes part in the lexical comparison, so entries
//! sharing a first character and a length keep their input order.

use crate::tree::node::TreePath;
use std::cmp::Reverse;

/// Composed sort key for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    not_dotfile: bool,
    lead: Option<char>,
    depth: Reverse<usize>,
}

impl SortKey {
    pub fn of(path: &str) -> Self {
        let lead = path.chars().next();
        Self {
            not_dotfile: lead != Some('.'),
            lead,
            depth: Reverse(path.chars().count()),
        }
    }
}

/// Orders tree nodes for display.
pub struct TreeSorter;

impl TreeSorter {
    /// Stable sort; sorting an already sorted sequence is a no-op.
    pub fn sort<N: TreePath>(mut nodes: Vec<N>) -> Vec<N> {
        Self::sort_in_place(&mut nodes);
        nodes
    }

    pub fn sort_in_place<N: TreePath>(nodes: &mut [N]) {
        nodes.sort_by_cached_key(|node| SortKey::of(node.tree_path()));
    }
}
