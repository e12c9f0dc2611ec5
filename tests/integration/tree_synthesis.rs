use proptest::prelude::*;
use sidetree::tree::path::ancestors;
use sidetree::tree::{NodeKind, PathTreeBuilder, TreeNode, TreeSorter};
use std::collections::{BTreeSet, HashSet};

fn sorted_paths(nodes: &[TreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.path.as_str()).collect()
}

#[test]
fn test_end_to_end_listing() {
    let nodes = TreeSorter::sort(PathTreeBuilder::synthesize([
        "a/b.txt",
        "a/c/d.txt",
        "e.txt",
    ]));
    assert_eq!(
        sorted_paths(&nodes),
        vec!["a/c/d.txt", "a/b.txt", "a/c", "a", "e.txt"]
    );
    let kinds: Vec<NodeKind> = nodes.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::File,
            NodeKind::File,
            NodeKind::Directory,
            NodeKind::Directory,
            NodeKind::File
        ]
    );
}

#[test]
fn test_dotfiles_lead_a_realistic_listing() {
    let nodes = TreeSorter::sort(PathTreeBuilder::synthesize([
        "README.md",
        "src/lib.rs",
        ".github/workflows/ci.yml",
        ".editorconfig",
    ]));
    let paths = sorted_paths(&nodes);
    let first_plain = paths.iter().position(|p| !p.starts_with('.')).unwrap();
    assert!(paths[..first_plain].iter().all(|p| p.starts_with('.')));
    assert!(paths[first_plain..].iter().all(|p| !p.starts_with('.')));
    assert_eq!(paths[0], ".github/workflows/ci.yml");
}

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c.]{1,3}", 1..5).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_every_ancestor_present_exactly_once(paths in prop::collection::vec(arb_path(), 0..32)) {
        let nodes = PathTreeBuilder::synthesize(&paths);
        let inputs: HashSet<&str> = paths.iter().map(String::as_str).collect();

        let expected_dirs: BTreeSet<String> = paths
            .iter()
            .flat_map(|p| ancestors(p).map(str::to_string).collect::<Vec<_>>())
            .filter(|d| !inputs.contains(d.as_str()))
            .collect();
        let dir_paths: Vec<String> = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Directory)
            .map(|n| n.path.clone())
            .collect();
        let dir_set: BTreeSet<String> = dir_paths.iter().cloned().collect();
        prop_assert_eq!(dir_paths.len(), dir_set.len());
        prop_assert_eq!(dir_set, expected_dirs);

        let file_set: BTreeSet<&str> = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::File)
            .map(|n| n.path.as_str())
            .collect();
        prop_assert_eq!(file_set, inputs.into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn prop_sort_is_idempotent(paths in prop::collection::vec(arb_path(), 0..32)) {
        let once = TreeSorter::sort(PathTreeBuilder::synthesize(&paths));
        let twice = TreeSorter::sort(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sorted_output_respects_key_order(paths in prop::collection::vec(arb_path(), 0..32)) {
        let sorted = TreeSorter::sort(PathTreeBuilder::synthesize(&paths));
        for pair in sorted.windows(2) {
            let a = sidetree::tree::SortKey::of(&pair[0].path);
            let b = sidetree::tree::SortKey::of(&pair[1].path);
            prop_assert!(a <= b);

            let (x, y) = (&pair[0].path, &pair[1].path);
            if !x.starts_with('.') && !y.starts_with('.') {
                // the leading character dominates path length
                prop_assert!(x.chars().next() <= y.chars().next());
                if x.chars().next() == y.chars().next() {
                    prop_assert!(x.chars().count() >= y.chars().count());
                }
            }
        }
    }
}
