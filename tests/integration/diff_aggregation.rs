use sidetree::diff::{ChangeKind, ChangeRecord, DiffTreeBuilder};
use sidetree::tree::{NodeKind, TreeSorter};

#[test]
fn test_end_to_end_diff() {
    let nodes = TreeSorter::sort(DiffTreeBuilder::synthesize_from_diff(vec![
        ChangeRecord::new("x/y.txt", ChangeKind::Modified, 3, 1),
        ChangeRecord::new("x/z.txt", ChangeKind::Added, 0, 5),
    ]));
    let x = nodes.iter().find(|n| n.path == "x").unwrap();
    assert_eq!(x.kind(), NodeKind::Directory);
    assert_eq!(x.additions, 3);
    assert_eq!(x.deletions, 6);
    assert_eq!(x.files_changed(), Some(2));
}

#[test]
fn test_records_from_json_feed_the_builder() {
    let records: Vec<ChangeRecord> = serde_json::from_str(
        r#"[
            {"path": "docs/guide/intro.md", "change_kind": "added", "additions": 40},
            {"path": "docs/index.md", "change_kind": "modified", "additions": 2, "deletions": 2},
            {"path": "src/old.rs", "change_kind": "removed", "deletions": 120}
        ]"#,
    )
    .unwrap();
    let nodes = DiffTreeBuilder::synthesize_from_diff(records);

    let docs = nodes.iter().find(|n| n.path == "docs").unwrap();
    assert_eq!((docs.additions, docs.deletions, docs.files_changed()), (42, 2, Some(2)));
    let guide = nodes.iter().find(|n| n.path == "docs/guide").unwrap();
    assert_eq!(guide.files_changed(), Some(1));
    let src = nodes.iter().find(|n| n.path == "src").unwrap();
    assert_eq!((src.additions, src.deletions), (0, 120));
    assert_eq!(nodes.len(), 6);
}

#[test]
fn test_diff_node_json_shape() {
    let nodes = DiffTreeBuilder::synthesize_from_diff(vec![ChangeRecord::new(
        "a/b.json",
        ChangeKind::Modified,
        1,
        0,
    )]);
    let file = nodes.iter().find(|n| n.path == "a/b.json").unwrap();
    let json = serde_json::to_value(file).unwrap();
    assert_eq!(json["type"], "file");
    assert_eq!(json["change_kind"], "modified");
    assert_eq!(json["diff_index"], 0);
    assert_eq!(json["icon"], "json");
    assert!(json.get("files_changed").is_none());
}
