//! Flat path listing → tree nodes

use crate::tree::node::TreeNode;
use crate::tree::path::ancestors;
use std::collections::HashSet;

/// Builds [`TreeNode`]s from a flat listing of file paths.
///
/// Directories are never listed explicitly; each one is synthesized from the
/// paths below it. Output order is deterministic (synthesized directories in
/// first-seen order, then files in input order) but carries no meaning;
/// ordering is the sorter's job.
pub struct PathTreeBuilder;

impl PathTreeBuilder {
    pub fn synthesize<I, S>(paths: I) -> Vec<TreeNode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<String> = Vec::new();
        let mut file_set: HashSet<String> = HashSet::new();
        for path in paths {
            let path = path.as_ref();
            if file_set.insert(path.to_string()) {
                files.push(path.to_string());
            }
        }

        let mut directories: Vec<&str> = Vec::new();
        let mut dir_set: HashSet<&str> = HashSet::new();
        for path in &files {
            for ancestor in ancestors(path) {
                if !dir_set.insert(ancestor) {
                    // everything above an already seen directory is recorded too
                    break;
                }
                // a path listed verbatim stays a file
                if !file_set.contains(ancestor) {
                    directories.push(ancestor);
                }
            }
        }

        let mut nodes = Vec::with_capacity(directories.len() + files.len());
        nodes.extend(directories.into_iter().map(TreeNode::directory));
        nodes.extend(files.iter().map(|path| TreeNode::file(path.as_str())));

        tracing::debug!(
            files = files.len(),
            nodes = nodes.len(),
            "Synthesized tree from flat listing"
        );
        nodes
    }
}
