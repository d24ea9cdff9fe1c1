//! gwf-graph - Render the target dependency graph of a workflow
//!
//! Targets reachable from a set of roots are collected in dependency order
//! and drawn as a Graphviz diagram, emitted as Graphviz source, or listed as
//! adjacency lines, optionally colored by each target's execution status.

pub mod domain;
pub mod storage;
pub mod status;
pub mod render;
pub mod cli;

pub use domain::{DependencyGraph, GraphProvider, StatusMap, Target, TargetStatus};
