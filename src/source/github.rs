//! GitHub REST API source

use crate::config::RemoteConfig;
use crate::diff::{ChangeKind, ChangeRecord};
use crate::error::ApiError;
use crate::repo::RepoRef;
use crate::source::{PathListing, TreeSource};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}/git/trees/{tree}?recursive=1`
#[derive(Debug, Deserialize)]
pub(crate) struct GitTreeResponse {
    #[serde(default)]
    pub tree: Vec<GitTreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitTreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// One element of `GET /repos/{owner}/{repo}/pulls/{n}/files`
#[derive(Debug, Deserialize)]
pub(crate) struct PullFile {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub previous_filename: Option<String>,
}

/// Files in the listing: blobs, plus submodules (`commit` entries).
/// Directory entries are dropped; directories are synthesized later.
pub(crate) fn parse_tree_listing(response: GitTreeResponse) -> PathListing {
    let paths = response
        .tree
        .into_iter()
        .filter(|item| item.item_type == "blob" || item.item_type == "commit")
        .map(|item| item.path)
        .collect();
    PathListing {
        paths,
        truncated: response.truncated,
    }
}

pub(crate) fn parse_pull_files(files: Vec<PullFile>) -> Vec<ChangeRecord> {
    files
        .into_iter()
        .map(|file| {
            let change_kind = file.status.parse::<ChangeKind>().unwrap_or_else(|e| {
                tracing::warn!(path = %file.filename, error = %e, "Unknown file status, using 'changed'");
                ChangeKind::Changed
            });
            ChangeRecord {
                path: file.filename,
                change_kind,
                additions: file.additions,
                deletions: file.deletions,
                previous_path: file.previous_filename,
                sha: file.sha,
            }
        })
        .collect()
}

pub struct GithubSource {
    client: reqwest::Client,
    api_base: String,
    per_page: u32,
    max_pages: u32,
}

impl GithubSource {
    pub fn new(config: &RemoteConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ApiError::ConfigError(format!("Invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, user_agent);
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| ApiError::ConfigError(format!("Invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            per_page: config.per_page.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!("{}/repos/{}/{}{}", self.api_base, repo.owner, repo.name, suffix)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RemoteStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TreeSource for GithubSource {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_paths(&self, repo: &RepoRef) -> Result<PathListing, ApiError> {
        let url = self.repo_url(repo, &format!("/git/trees/{}?recursive=1", repo.tree_ish()));
        let response: GitTreeResponse = self.get_json(&url).await?;
        let listing = parse_tree_listing(response);
        tracing::info!(
            repo = %repo,
            paths = listing.paths.len(),
            truncated = listing.truncated,
            "Fetched tree listing"
        );
        Ok(listing)
    }

    async fn list_changes(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<ChangeRecord>, ApiError> {
        let mut records = Vec::new();
        for page in 1..=self.max_pages {
            let url = self.repo_url(
                repo,
                &format!(
                    "/pulls/{}/files?per_page={}&page={}",
                    pull_number, self.per_page, page
                ),
            );
            let files: Vec<PullFile> = self.get_json(&url).await?;
            let count = files.len();
            records.extend(parse_pull_files(files));
            if count < self.per_page as usize {
                break;
            }
            if page == self.max_pages {
                tracing::warn!(repo = %repo, pull_number, pages = page, "Pull request file list hit the page limit");
            }
        }
        tracing::info!(repo = %repo, pull_number, files = records.len(), "Fetched pull request files");
        Ok(records)
    }
}
