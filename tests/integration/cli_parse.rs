use clap::{CommandFactory, Parser};
use sidetree::tooling::cli::{Cli, CliContext};
use sidetree::config::SidetreeConfig;
use sidetree::clock::ManualClock;
use sidetree::store::MemoryStore;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["sidetree", "tree", "octo/cat"],
        vec!["sidetree", "tree", "octo/cat@main", "--format", "json"],
        vec!["sidetree", "tree", "--local", "."],
        vec!["sidetree", "tree", "--paths-file", "paths.txt", "--truncated"],
        vec!["sidetree", "diff", "octo/cat#12"],
        vec!["sidetree", "diff", "octo/cat", "--pull", "12", "--changes-file", "c.json"],
        vec!["sidetree", "decide", "octo/cat", "--pull", "3"],
        vec!["sidetree", "cache", "list"],
        vec!["sidetree", "cache", "record", "octo/cat"],
        vec!["sidetree", "cache", "touch", "octo/cat"],
        vec!["sidetree", "settings", "show", "--format", "json"],
        vec!["sidetree", "settings", "set", "pr-mode", "off"],
        vec!["sidetree", "config", "show", "--defaults"],
        vec!["sidetree", "--ephemeral", "--log-level", "debug", "cache", "list"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_combinations() {
    assert!(Cli::try_parse_from(["sidetree", "tree", "--local", ".", "--paths-file", "p"]).is_err());
    assert!(Cli::try_parse_from(["sidetree", "tree", "--truncated"]).is_err());
    assert!(Cli::try_parse_from(["sidetree", "diff"]).is_err());
    assert!(Cli::try_parse_from(["sidetree", "decide", "octo/cat", "--pull", "x"]).is_err());
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn tree_from_path_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("paths.txt");
    fs::write(&file, "a/b.txt\na/c/d.txt\ne.txt\n").unwrap();

    let context = CliContext::with_parts(
        SidetreeConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    )
    .unwrap();
    let file_arg = file.to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "sidetree",
        "tree",
        "octo/cat",
        "--paths-file",
        file_arg.as_str(),
        "--truncated",
        "--format",
        "json",
    ])
    .unwrap();

    let output = context.execute(&cli.command).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["truncated"], true);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(value["nodes"][0]["path"], "a/c/d.txt");

    // the truncated listing marked the repository as large
    let decide = Cli::try_parse_from(["sidetree", "decide", "octo/cat"]).unwrap();
    let answer = context.execute(&decide.command).unwrap();
    assert!(answer.contains("lazy"));
}

#[test]
fn diff_from_changes_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("changes.json");
    fs::write(
        &file,
        r#"[{"path": "x/y.txt", "change_kind": "modified", "additions": 3, "deletions": 1},
            {"path": "x/z.txt", "change_kind": "removed", "deletions": 5}]"#,
    )
    .unwrap();

    let context = CliContext::with_parts(
        SidetreeConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    )
    .unwrap();
    let file_arg = file.to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "sidetree",
        "diff",
        "octo/cat#5",
        "--changes-file",
        file_arg.as_str(),
        "--format",
        "json",
    ])
    .unwrap();

    let output = context.execute(&cli.command).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["pull_number"], 5);
    let x = value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["path"] == "x")
        .unwrap()
        .clone();
    assert_eq!(x["type"], "directory");
    assert_eq!(x["additions"], 3);
    assert_eq!(x["deletions"], 6);
    assert_eq!(x["files_changed"], 2);
}
