//! # Storage Layer
//!
//! Everything gwf-graph reads from disk.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Workflow | TOML, one `[[target]]` table per target | `workflow.toml` (or `--workflow`) |
//! | Job log | JSONL (one JSON per line) | `.gwf/jobs.jsonl` |
//! | Config | TOML | `.gwf/graph.toml`, `~/.config/gwf-graph/config.toml` |
//!
//! ## Key Types
//!
//! - [`Workflow`] - Target declarations and the dependency graph they imply
//! - [`JobStore`] - Backend job states, read under a shared file lock
//! - [`Config`] - Project and global configuration

mod workflow;
mod jobs;
mod config;

pub use workflow::{TargetSpec, Workflow};
pub use jobs::{JobState, JobStore};
pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig, DEFAULT_DOT_COMMAND, DEFAULT_FORMAT};
