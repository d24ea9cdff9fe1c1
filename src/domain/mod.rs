//! Domain models for gwf-graph
//!
//! Targets, the dependency graph and the traversal over it, without any I/O
//! concerns.

mod target;
mod graph;
mod traversal;
mod filter;

pub use target::{Target, TargetStatus, StatusMap, NEUTRAL_COLOR};
pub use graph::{DependencyGraph, GraphError, GraphProvider};
pub use traversal::{traverse, TraversalError};
pub use filter::{select_roots, SelectionError};
