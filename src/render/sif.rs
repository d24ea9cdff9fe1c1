//! Adjacency listing
//!
//! One line per visited target that has dependencies:
//! `<target> dependencies <dep1> <dep2> ...`. Targets without dependencies
//! produce no line.

use crate::domain::{GraphProvider, Target};

/// Renders the adjacency listing for a traversal result
pub fn adjacency_listing<G: GraphProvider + ?Sized>(graph: &G, visited: &[Target]) -> String {
    visited
        .iter()
        .filter_map(|target| {
            let deps = graph.dependencies(target);
            if deps.is_empty() {
                return None;
            }
            let names: Vec<&str> = deps.iter().map(Target::name).collect();
            Some(format!("{} dependencies {}", target, names.join(" ")))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
