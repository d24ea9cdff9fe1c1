//! Target domain model
//!
//! A target is a named unit of work in a workflow. Its name is its identity:
//! two targets with the same name are the same target.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// A uniquely named unit of work
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Creates a target from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the target name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Target {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Execution status of a target, as reported by a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    ShouldRun,
    Submitted,
    Running,
    Completed,
}

impl TargetStatus {
    /// Returns the fill color used when drawing a target with this status
    pub fn color(&self) -> &'static str {
        match self {
            TargetStatus::ShouldRun => "purple",
            TargetStatus::Submitted => "yellow",
            TargetStatus::Running => "blue",
            TargetStatus::Completed => "green",
        }
    }

    /// Returns the display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            TargetStatus::ShouldRun => "should run",
            TargetStatus::Submitted => "submitted",
            TargetStatus::Running => "running",
            TargetStatus::Completed => "completed",
        }
    }

    /// Returns true if the target has been handed to the backend
    pub fn is_scheduled(&self) -> bool {
        matches!(self, TargetStatus::Submitted | TargetStatus::Running)
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of every target that was resolved for one render
pub type StatusMap = HashMap<Target, TargetStatus>;

/// Fill color for targets drawn without status annotation
pub const NEUTRAL_COLOR: &str = "white";
