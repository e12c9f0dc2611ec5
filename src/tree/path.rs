//! Slash-delimited path helpers.
//!
//! Paths coming from remote listings are treated as opaque strings: no
//! normalization, no special-casing of empty or doubled separators.

use crate::types::PATH_SEPARATOR;

/// Last segment of `path` (the whole path when it has no separator).
pub fn name_of(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Extension of the last segment: the suffix after its last `.`.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = name_of(path);
    let idx = name.rfind('.')?;
    let ext = &name[idx + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Immediate parent of `path`, or `None` at the top level.
///
/// A leading separator yields an empty prefix, which is not a parent.
pub fn parent_of(path: &str) -> Option<&str> {
    let idx = path.rfind(PATH_SEPARATOR)?;
    let parent = &path[..idx];
    if parent.is_empty() {
        None
    } else {
        Some(parent)
    }
}

/// Proper ancestors of `path`, deepest first.
///
/// `"a/c/d.txt"` yields `"a/c"` then `"a"`.
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors { current: path }
}

/// Iterator returned by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    current: &'a str,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let parent = parent_of(self.current)?;
        self.current = parent;
        Some(parent)
    }
}
