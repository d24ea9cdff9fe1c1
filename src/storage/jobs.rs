//! Job log written by the execution backend
//!
//! The backend appends one JSON object per line whenever a target's job
//! changes state:
//!
//! ```text
//! {"target": "align", "state": "submitted"}
//! {"target": "align", "state": "running"}
//! ```
//!
//! Later lines override earlier ones. The log is read under a shared lock so
//! a backend holding the exclusive lock is never observed mid-write.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::Target;

/// State of a target's job in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Returns true while the backend still owns the job
    pub fn is_pending(&self) -> bool {
        matches!(self, JobState::Submitted | JobState::Running)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JobEntry {
    target: Target,
    state: JobState,
}

/// Read access to the job log
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    /// Creates a store for the log at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the latest state of every target in the log
    ///
    /// A missing log means no target has ever been submitted.
    pub fn read_all(&self) -> Result<HashMap<Target, JobState>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open job log: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on job log")?;

        let reader = BufReader::new(&file);
        let mut states = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JobEntry = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse job entry at line {}", line_num + 1))?;

            states.insert(entry.target, entry.state);
        }

        // Lock is released when file is dropped
        Ok(states)
    }
}
