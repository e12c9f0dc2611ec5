//! Changed-file records → diff tree nodes with rolled-up statistics

use crate::diff::node::{DiffEntry, DiffTreeNode};
use crate::diff::record::ChangeRecord;
use crate::tree::path::ancestors;
use std::collections::HashMap;

/// Running totals for one synthetic directory
#[derive(Debug, Default, Clone, Copy)]
struct DirTotals {
    additions: u64,
    deletions: u64,
    files_changed: u64,
}

impl DirTotals {
    fn absorb(&mut self, record: &ChangeRecord) {
        self.additions = self.additions.saturating_add(record.additions);
        self.deletions = self.deletions.saturating_add(record.deletions);
        self.files_changed = self.files_changed.saturating_add(1);
    }
}

/// Builds [`DiffTreeNode`]s from the records of one comparison.
///
/// Every record becomes a file node. Each proper ancestor of a record's path
/// becomes a directory node whose counts are the sums over all records below
/// it. Sums do not depend on record order.
pub struct DiffTreeBuilder;

impl DiffTreeBuilder {
    pub fn synthesize_from_diff<I>(records: I) -> Vec<DiffTreeNode>
    where
        I: IntoIterator<Item = ChangeRecord>,
    {
        let mut files: Vec<DiffTreeNode> = Vec::new();
        let mut file_index: HashMap<String, usize> = HashMap::new();
        let mut dir_order: Vec<String> = Vec::new();
        let mut dir_totals: HashMap<String, DirTotals> = HashMap::new();
        let mut record_count = 0usize;

        for (diff_index, record) in records.into_iter().enumerate() {
            record_count += 1;
            for ancestor in ancestors(&record.path) {
                match dir_totals.get_mut(ancestor) {
                    Some(totals) => totals.absorb(&record),
                    None => {
                        let mut totals = DirTotals::default();
                        totals.absorb(&record);
                        dir_totals.insert(ancestor.to_string(), totals);
                        dir_order.push(ancestor.to_string());
                    }
                }
            }

            let ChangeRecord {
                path,
                change_kind,
                additions,
                deletions,
                previous_path,
                sha,
            } = record;
            let node = DiffTreeNode::new(
                path.clone(),
                additions,
                deletions,
                DiffEntry::File {
                    change_kind,
                    diff_index,
                    previous_path,
                    sha,
                },
            );
            match file_index.get(&path) {
                // a repeated path keeps its slot; the latest record wins
                Some(&idx) => files[idx] = node,
                None => {
                    file_index.insert(path, files.len());
                    files.push(node);
                }
            }
        }

        let mut nodes = Vec::with_capacity(dir_order.len() + files.len());
        for path in dir_order {
            let totals = dir_totals.get(&path).copied().unwrap_or_default();
            // a path listed verbatim stays a file
            if file_index.contains_key(&path) {
                tracing::debug!(
                    path = %path,
                    additions = totals.additions,
                    deletions = totals.deletions,
                    files_changed = totals.files_changed,
                    "Dropping directory totals for a path also changed as a file"
                );
                continue;
            }
            nodes.push(DiffTreeNode::new(
                path,
                totals.additions,
                totals.deletions,
                DiffEntry::Directory {
                    files_changed: totals.files_changed,
                },
            ));
        }
        nodes.extend(files);

        tracing::debug!(
            records = record_count,
            nodes = nodes.len(),
            "Synthesized diff tree"
        );
        nodes
    }
}
