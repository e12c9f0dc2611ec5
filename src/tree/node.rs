//! Tree node types and icon derivation

use crate::tree::path::{extension_of, name_of};
use serde::{Deserialize, Serialize};

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
        }
    }
}

/// Display hint for the icon next to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconHint {
    Directory,
    JavaScript,
    TypeScript,
    Text,
    Config,
    Shell,
    Json,
    /// License files, matched by name rather than extension
    Book,
    /// Any other extension, kept verbatim
    Extension(String),
    /// File without an extension
    Default,
}

impl IconHint {
    /// Derive the hint for a node from its kind and path.
    pub fn for_path(kind: NodeKind, path: &str) -> Self {
        match kind {
            NodeKind::Directory => IconHint::Directory,
            NodeKind::File => {
                if name_of(path) == "LICENSE" {
                    return IconHint::Book;
                }
                match extension_of(path) {
                    Some("js") => IconHint::JavaScript,
                    Some("ts") => IconHint::TypeScript,
                    Some("txt") => IconHint::Text,
                    Some("conf") => IconHint::Config,
                    Some("sh") => IconHint::Shell,
                    Some("json") => IconHint::Json,
                    Some(other) => IconHint::Extension(other.to_string()),
                    None => IconHint::Default,
                }
            }
        }
    }

    /// Short label used by text renderers.
    pub fn label(&self) -> &str {
        match self {
            IconHint::Directory => "tree",
            IconHint::JavaScript => "js",
            IconHint::TypeScript => "ts",
            IconHint::Text => "text",
            IconHint::Config => "config",
            IconHint::Shell => "terminal",
            IconHint::Json => "database",
            IconHint::Book => "book",
            IconHint::Extension(ext) => ext.as_str(),
            IconHint::Default => "file",
        }
    }
}

/// One file or directory in a synthesized tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub icon: IconHint,
}

impl TreeNode {
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        let path = path.into();
        Self {
            name: name_of(&path).to_string(),
            icon: IconHint::for_path(kind, &path),
            kind,
            path,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::Directory)
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::File)
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Anything the sorter can order: it only needs the node's full path.
pub trait TreePath {
    fn tree_path(&self) -> &str;
}

impl TreePath for TreeNode {
    fn tree_path(&self) -> &str {
        &self.path
    }
}
