//! Configuration handling for gwf-graph
//!
//! Configuration is stored in `.gwf/graph.toml` next to the workflow file
//! (project) and `~/.config/gwf-graph/config.toml` (global). Project values
//! override global ones; command-line flags override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output format used when neither flag nor config names one
pub const DEFAULT_FORMAT: &str = "svg";

/// Graphviz executable used when nothing else is configured
pub const DEFAULT_DOT_COMMAND: &str = "dot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Output format when `--format` is not given
    pub default_format: Option<String>,

    /// File name stem for rendered images (`<stem>.<format>`)
    pub output_stem: String,

    /// Job log written by the backend, relative to the workflow directory
    pub jobs_file: PathBuf,

    /// Graphviz command, may include leading arguments
    pub dot_command: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_format: None,
            output_stem: "dependency_graph".to_string(),
            jobs_file: PathBuf::from(".gwf").join("jobs.jsonl"),
            dot_command: None,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Output format when neither flag nor project config names one
    pub default_format: Option<String>,

    /// Graphviz command, may include leading arguments
    pub dot_command: Option<String>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for the workflow rooted at `workflow_root`
    pub fn load(workflow_root: &Path) -> Result<Self> {
        let global = match Self::global_config_dir() {
            Some(dir) => Self::read_or_default(&dir.join("config.toml"))
                .context("Failed to load global config")?,
            None => GlobalConfig::default(),
        };
        let project = Self::read_or_default(&Self::project_config_path(workflow_root))
            .context("Failed to load project config")?;

        Ok(Self { project, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "gwf", "gwf-graph").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the project config path for a workflow directory
    pub fn project_config_path(workflow_root: &Path) -> PathBuf {
        workflow_root.join(".gwf").join("graph.toml")
    }

    fn read_or_default<T>(path: &Path) -> Result<T>
    where
        T: Default + for<'de> Deserialize<'de>,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let parsed = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(parsed)
    }

    /// Returns the configured default output format
    pub fn default_format(&self) -> &str {
        self.project
            .default_format
            .as_deref()
            .or(self.global.default_format.as_deref())
            .unwrap_or(DEFAULT_FORMAT)
    }

    /// Returns the configured Graphviz command
    pub fn dot_command(&self) -> &str {
        self.project
            .dot_command
            .as_deref()
            .or(self.global.dot_command.as_deref())
            .unwrap_or(DEFAULT_DOT_COMMAND)
    }

    /// Returns the default image path for a format, e.g. `dependency_graph.svg`
    pub fn default_image_path(&self, format: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.project.output_stem, format))
    }
}
