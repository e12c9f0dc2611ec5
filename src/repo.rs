//! Repository references

use crate::error::ApiError;
use crate::types::RepoKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// A repository on the remote host, optionally pinned to a branch and a
/// pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_number: Option<u64>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: None,
            pull_number: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_pull_number(mut self, pull_number: u64) -> Self {
        self.pull_number = Some(pull_number);
        self
    }

    /// Cache key: `"owner/name"`.
    pub fn key(&self) -> RepoKey {
        format!("{}/{}", self.owner, self.name)
    }

    /// Branch for display, without a leading `refs/heads/`.
    pub fn display_branch(&self) -> Option<&str> {
        self.branch
            .as_deref()
            .map(|branch| branch.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(branch))
    }

    /// Tree-ish used when listing: the branch if any, else `HEAD`.
    pub fn tree_ish(&self) -> &str {
        self.display_branch().unwrap_or("HEAD")
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(branch) = self.display_branch() {
            write!(f, "@{}", branch)?;
        }
        if let Some(pull_number) = self.pull_number {
            write!(f, "#{}", pull_number)?;
        }
        Ok(())
    }
}

/// Parses `owner/name`, optionally followed by `@branch` and/or `#pull`.
impl FromStr for RepoRef {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (rest, pull_number) = match s.rsplit_once('#') {
            Some((rest, pull)) => {
                let pull = pull
                    .parse::<u64>()
                    .map_err(|_| ApiError::InvalidRepo(format!("bad pull number in '{}'", s)))?;
                (rest, Some(pull))
            }
            None => (s, None),
        };
        let (slug, branch) = match rest.split_once('@') {
            Some((slug, branch)) if !branch.is_empty() => (slug, Some(branch.to_string())),
            Some(_) => return Err(ApiError::InvalidRepo(format!("empty branch in '{}'", s))),
            None => (rest, None),
        };
        let (owner, name) = slug
            .split_once('/')
            .ok_or_else(|| ApiError::InvalidRepo(format!("expected owner/name, got '{}'", s)))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(ApiError::InvalidRepo(format!(
                "expected owner/name, got '{}'",
                s
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            branch,
            pull_number,
        })
    }
}
