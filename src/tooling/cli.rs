//! CLI Tooling
//!
//! Command-line interface over the tree service: print sorted trees and
//! diff trees, answer eager/lazy decisions and manage the persisted cache
//! and settings.

use crate::clock::{Clock, SystemClock};
use crate::config::SidetreeConfig;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::repo::RepoRef;
use crate::service::TreeService;
use crate::source::{GithubSource, LocalSource, StaticSource, TreeSource};
use crate::store::{KeyValueStore, MemoryStore, SledStore};
use crate::tooling::format::{
    format_cache_table, format_decision_text, format_diff_text, format_settings_text,
    format_tree_text, to_json,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sidetree CLI - file trees from flat repository listings
#[derive(Parser, Debug)]
#[command(name = "sidetree", version)]
#[command(about = "Synthesize sorted file trees and diff trees from flat repository listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Keep cache and settings in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply `--log-*` flags on top of the configured logging section.
    pub fn apply_log_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the sorted tree of a repository, local directory or path file
    Tree {
        /// Repository as owner/name[@branch]; fetched from the remote API
        repo: Option<String>,
        /// List a local directory instead of the remote
        #[arg(long, conflicts_with = "paths_file")]
        local: Option<PathBuf>,
        /// Read paths (one per line) from a file instead of the remote
        #[arg(long)]
        paths_file: Option<PathBuf>,
        /// Treat the path file as a truncated listing
        #[arg(long, requires = "paths_file")]
        truncated: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the aggregated diff tree of a pull request
    Diff {
        /// Repository as owner/name[#pull]
        repo: String,
        /// Pull request number (overrides #pull in the repository)
        #[arg(long)]
        pull: Option<u64>,
        /// Read change records (JSON array) from a file instead of the remote
        #[arg(long)]
        changes_file: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Decide whether a repository tree loads eagerly or lazily
    Decide {
        /// Repository as owner/name[#pull]
        repo: String,
        /// Pull request number, making this a pull request view
        #[arg(long)]
        pull: Option<u64>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect or update the large-repository cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Show the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List remembered repositories, most recent first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Remember a repository as large
    Record {
        /// Repository as owner/name
        repo: String,
    },
    /// Refresh a remembered repository; unknown repositories are left alone
    Touch {
        /// Repository as owner/name
        repo: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all settings
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set a setting (lazy-load or pr-mode) to on or off
    Set {
        /// Setting name: lazy-load or pr-mode
        key: String,
        /// on/off, true/false, yes/no or 1/0
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show {
        /// Print built-in defaults instead
        #[arg(long)]
        defaults: bool,
    },
}

fn check_format(format: &str) -> Result<(), ApiError> {
    if format == "text" || format == "json" {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "Unknown output format '{}' (expected text or json)",
            format
        )))
    }
}

fn parse_switch(value: &str) -> Result<bool, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ApiError::InvalidInput(format!(
            "Expected on or off, got '{}'",
            other
        ))),
    }
}

/// Label for a local listing: `local/<directory name>`.
fn local_repo_ref(root: &Path) -> RepoRef {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "root".to_string());
    RepoRef::new("local", name)
}

/// CLI context: configuration, store, clock and the runtime async fetches
/// run on.
pub struct CliContext {
    config: SidetreeConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Open the configured store (or an in-memory one when `ephemeral`).
    pub fn new(
        config: SidetreeConfig,
        store_path: Option<PathBuf>,
        ephemeral: bool,
    ) -> Result<Self, ApiError> {
        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            let path = match store_path {
                Some(path) => path,
                None => config.storage.resolve_path()?,
            };
            Arc::new(SledStore::open(&path)?)
        };
        Self::with_parts(config, store, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: SidetreeConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        Ok(Self {
            config,
            store,
            clock,
            runtime,
        })
    }

    pub fn config(&self) -> &SidetreeConfig {
        &self.config
    }

    fn service(&self, source: Arc<dyn TreeSource>) -> TreeService {
        TreeService::new(
            source,
            self.store.clone(),
            self.clock.clone(),
            self.config.cache.policy(),
        )
    }

    /// Service for commands that never fetch.
    fn offline_service(&self) -> TreeService {
        self.service(Arc::new(StaticSource::default()))
    }

    fn github_source(&self) -> Result<Arc<dyn TreeSource>, ApiError> {
        Ok(Arc::new(GithubSource::new(&self.config.remote)?))
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                repo,
                local,
                paths_file,
                truncated,
                format,
            } => {
                check_format(format)?;
                self.handle_tree(repo.as_deref(), local.as_deref(), paths_file.as_deref(), *truncated, format)
            }
            Commands::Diff {
                repo,
                pull,
                changes_file,
                format,
            } => {
                check_format(format)?;
                self.handle_diff(repo, *pull, changes_file.as_deref(), format)
            }
            Commands::Decide { repo, pull, format } => {
                check_format(format)?;
                let mut repo: RepoRef = repo.parse()?;
                if let Some(pull) = pull {
                    repo.pull_number = Some(*pull);
                }
                let decision = self.offline_service().decide(&repo);
                if format == "json" {
                    to_json(&serde_json::json!({
                        "repo": repo.key(),
                        "pull_number": repo.pull_number,
                        "lazy": decision.lazy,
                        "load_entire_tree": !decision.lazy,
                        "reason": decision.reason,
                    }))
                } else {
                    Ok(format_decision_text(&repo.to_string(), &decision))
                }
            }
            Commands::Cache { command } => self.handle_cache_command(command),
            Commands::Settings { command } => self.handle_settings_command(command),
            Commands::Config { command } => match command {
                ConfigCommands::Show { defaults } => {
                    let config = if *defaults {
                        crate::config::ConfigLoader::default()
                    } else {
                        self.config.clone()
                    };
                    toml::to_string_pretty(&config)
                        .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
                }
            },
        }
    }

    fn handle_tree(
        &self,
        repo: Option<&str>,
        local: Option<&Path>,
        paths_file: Option<&Path>,
        truncated: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let (source, repo): (Arc<dyn TreeSource>, RepoRef) = match (local, paths_file) {
            (Some(root), _) => {
                let source = LocalSource::new(root, &self.config.local)?;
                let repo = match repo {
                    Some(repo) => repo.parse()?,
                    None => local_repo_ref(source.root()),
                };
                let source: Arc<dyn TreeSource> = Arc::new(source);
                (source, repo)
            }
            (None, Some(file)) => {
                let source = StaticSource::from_path_file(file)?.truncated(truncated);
                let repo = match repo {
                    Some(repo) => repo.parse()?,
                    None => RepoRef::new("file", local_repo_ref(file).name),
                };
                let source: Arc<dyn TreeSource> = Arc::new(source);
                (source, repo)
            }
            (None, None) => {
                let repo: RepoRef = repo
                    .ok_or_else(|| {
                        ApiError::InvalidInput(
                            "A repository, --local or --paths-file is required".to_string(),
                        )
                    })?
                    .parse()?;
                (self.github_source()?, repo)
            }
        };

        let service = self.service(source);
        let load = self.runtime.block_on(service.load_tree(&repo))?;
        tracing::info!(repo = %repo, nodes = load.nodes.len(), truncated = load.truncated, "Loaded tree");
        if format == "json" {
            to_json(&load)
        } else {
            Ok(format_tree_text(&load))
        }
    }

    fn handle_diff(
        &self,
        repo: &str,
        pull: Option<u64>,
        changes_file: Option<&Path>,
        format: &str,
    ) -> Result<String, ApiError> {
        let mut repo: RepoRef = repo.parse()?;
        if let Some(pull) = pull {
            repo.pull_number = Some(pull);
        }
        let source: Arc<dyn TreeSource> = match changes_file {
            Some(file) => Arc::new(StaticSource::from_changes_file(file)?),
            None => self.github_source()?,
        };

        let service = self.service(source);
        let load = self.runtime.block_on(service.load_pull_request(&repo))?;
        if format == "json" {
            to_json(&load)
        } else {
            Ok(format_diff_text(&load))
        }
    }

    fn handle_cache_command(&self, command: &CacheCommands) -> Result<String, ApiError> {
        let service = self.offline_service();
        let cache = service.cache();
        match command {
            CacheCommands::List { format } => {
                check_format(format)?;
                let entries = cache.entries();
                if format == "json" {
                    to_json(&entries)
                } else {
                    Ok(format_cache_table(
                        &entries,
                        cache.policy().capacity,
                        self.clock.now_ms(),
                    ))
                }
            }
            CacheCommands::Record { repo } => {
                let repo: RepoRef = repo.parse()?;
                cache.record_large(&repo.key(), self.clock.now_ms());
                Ok(format!("Recorded {} as large ({} cached)", repo.key(), cache.size()))
            }
            CacheCommands::Touch { repo } => {
                let repo: RepoRef = repo.parse()?;
                if cache.touch(&repo.key(), self.clock.now_ms()) {
                    Ok(format!("Refreshed {}", repo.key()))
                } else {
                    Ok(format!("{} is not cached; nothing to refresh", repo.key()))
                }
            }
        }
    }

    fn handle_settings_command(&self, command: &SettingsCommands) -> Result<String, ApiError> {
        let service = self.offline_service();
        let settings = service.settings();
        match command {
            SettingsCommands::Show { format } => {
                check_format(format)?;
                let snapshot = settings.snapshot();
                if format == "json" {
                    to_json(&snapshot)
                } else {
                    Ok(format_settings_text(&snapshot))
                }
            }
            SettingsCommands::Set { key, value } => {
                let enabled = parse_switch(value)?;
                match key.as_str() {
                    "lazy-load" | "lazy_load" => settings.set_lazy_load(enabled)?,
                    "pr-mode" | "pr_mode" => settings.set_pr_mode(enabled)?,
                    other => {
                        return Err(ApiError::InvalidInput(format!(
                            "Unknown setting '{}' (expected lazy-load or pr-mode)",
                            other
                        )))
                    }
                }
                Ok(format!("{} = {}", key, enabled))
            }
        }
    }

    /// Flush the store before exit.
    pub fn shutdown(&self) -> Result<(), ApiError> {
        self.store.flush()?;
        Ok(())
    }
}
