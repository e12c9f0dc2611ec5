//! Text rendering for CLI output.

use crate::cache::LazyLoadCacheEntry;
use crate::diff::{DiffEntry, DiffTreeNode};
use crate::error::{ApiError, StorageError};
use crate::service::{DiffLoad, LoadDecision, TreeLoad};
use crate::settings::SettingsSnapshot;
use crate::types::Timestamp;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Bold, underlined section heading.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e)))
}

/// One line per node, in display order. Directories end with `/`.
pub fn format_tree_text(load: &TreeLoad) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&load.repo.to_string()));
    let mut directories = 0usize;
    for node in &load.nodes {
        let suffix = if node.is_directory() {
            directories += 1;
            "/"
        } else {
            ""
        };
        out.push_str(&format!("  {:<10} {}{}\n", node.icon.label(), node.path, suffix));
    }
    let files = load.nodes.len() - directories;
    out.push_str(&format!("\n{} directories, {} files\n", directories, files));
    if load.truncated {
        out.push_str(&format!(
            "{}\n",
            "Listing was truncated by the remote; the tree is incomplete.".yellow()
        ));
    }
    out
}

fn format_diff_line(node: &DiffTreeNode) -> String {
    let counts = format!("+{} -{}", node.additions, node.deletions);
    match &node.entry {
        DiffEntry::File {
            change_kind,
            previous_path,
            ..
        } => {
            let renamed = previous_path
                .as_deref()
                .map(|from| format!(" (from {})", from))
                .unwrap_or_default();
            format!(
                "  {}  {:<12} {}{}\n",
                change_kind.marker(),
                counts,
                node.path,
                renamed
            )
        }
        DiffEntry::Directory { files_changed } => {
            let noun = if *files_changed == 1 { "file" } else { "files" };
            format!(
                "     {:<12} {}/ ({} {})\n",
                counts, node.path, files_changed, noun
            )
        }
    }
}

pub fn format_diff_text(load: &DiffLoad) -> String {
    let title = format!("{} pull request #{}", load.repo.key(), load.pull_number);
    let mut out = format!("{}\n\n", format_section_heading(&title));
    if load.nodes.is_empty() {
        out.push_str("  No changed files.\n");
        return out;
    }
    let (mut additions, mut deletions, mut files) = (0u64, 0u64, 0usize);
    for node in &load.nodes {
        if let DiffEntry::File { .. } = node.entry {
            additions = additions.saturating_add(node.additions);
            deletions = deletions.saturating_add(node.deletions);
            files += 1;
        }
        out.push_str(&format_diff_line(node));
    }
    out.push_str(&format!(
        "\n{} files changed, {} additions, {} deletions\n",
        files, additions, deletions
    ));
    out
}

pub fn format_decision_text(repo: &str, decision: &LoadDecision) -> String {
    let mode = if decision.lazy { "lazy" } else { "eager" };
    let reason = match decision.reason {
        crate::service::DecisionReason::PullRequest => "pull request view",
        crate::service::DecisionReason::GlobalSetting => "lazy loading enabled globally",
        crate::service::DecisionReason::KnownLarge => "repository previously returned a truncated listing",
        crate::service::DecisionReason::NotObserved => "repository not known to be large",
    };
    format!("{}: {} ({})", repo, mode, reason)
}

fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}

fn format_age(now: Timestamp, ts: Timestamp) -> String {
    let secs = (now - ts).max(0) / 1000;
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s => format!("{}d", s / 86_400),
    }
}

pub fn format_cache_table(entries: &[LazyLoadCacheEntry], capacity: usize, now: Timestamp) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Large repositories ({}/{})", entries.len(), capacity))
    );
    if entries.is_empty() {
        out.push_str("  No repositories recorded.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Repository", "Last seen", "Age"]);
    for entry in entries {
        table.add_row(vec![
            entry.repo_key.clone(),
            format_timestamp(entry.last_seen_at),
            format_age(now, entry.last_seen_at),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_settings_text(settings: &SettingsSnapshot) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["lazy-load".to_string(), settings.lazy_load.to_string()]);
    table.add_row(vec!["pr-mode".to_string(), settings.pr_mode.to_string()]);
    format!("{}\n\n{}\n", format_section_heading("Settings"), table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeKind, ChangeRecord, DiffTreeBuilder};
    use crate::repo::RepoRef;
    use crate::tree::{PathTreeBuilder, TreeSorter};

    #[test]
    fn test_tree_text_lists_nodes_and_counts() {
        let load = TreeLoad {
            repo: RepoRef::new("octo", "cat"),
            nodes: TreeSorter::sort(PathTreeBuilder::synthesize(["a/b.txt", "a/c/d.txt", "e.txt"])),
            truncated: true,
        };
        let text = format_tree_text(&load);
        assert!(text.contains("a/c/\n"));
        assert!(text.contains("a/c/d.txt\n"));
        assert!(text.contains("2 directories, 3 files"));
        assert!(text.contains("truncated"));
    }

    #[test]
    fn test_diff_text() {
        let load = DiffLoad {
            repo: RepoRef::new("octo", "cat"),
            pull_number: 3,
            nodes: DiffTreeBuilder::synthesize_from_diff(vec![
                ChangeRecord::new("x/y.txt", ChangeKind::Modified, 3, 1),
                ChangeRecord::new("x/z.txt", ChangeKind::Removed, 0, 5),
            ]),
        };
        let text = format_diff_text(&load);
        assert!(text.contains("x/ (2 files)"));
        assert!(text.contains("D  +0 -5"));
        assert!(text.contains("2 files changed, 3 additions, 6 deletions"));
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(format_age(10_000, 5_000), "5s");
        assert_eq!(format_age(7_200_000, 0), "2h");
        assert_eq!(format_age(0, 5_000), "0s");
        assert_eq!(format_age(3 * 86_400_000, 0), "3d");
    }

    #[test]
    fn test_cache_table_empty() {
        let text = format_cache_table(&[], 50, 0);
        assert!(text.contains("No repositories recorded."));
        assert!(text.contains("(0/50)"));
    }

    #[test]
    fn test_timestamp_rendering() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
    }
}
