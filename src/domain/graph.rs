//! Dependency graph for targets
//!
//! Read-only view over a workflow's targets and the targets each one depends
//! on. Uses petgraph for storage. Cycles are not rejected here: the
//! traversal engine reports them when it meets one.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

use super::target::Target;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Target not found: {0}")]
    TargetNotFound(Target),

    #[error("Target defined more than once: {0}")]
    DuplicateTarget(Target),

    #[error("Output {path} is provided by both {first} and {second}")]
    ConflictingProviders {
        path: String,
        first: Target,
        second: Target,
    },
}

/// Anything that can answer "what does this target depend on?"
///
/// Implementations must return dependencies in a stable order so that
/// traversal and rendering are deterministic.
pub trait GraphProvider {
    /// Returns the direct dependencies of a target, in declaration order
    fn dependencies(&self, target: &Target) -> Vec<Target>;

    /// Returns every target in the graph, in declaration order
    fn all_targets(&self) -> Vec<Target>;

    /// Returns true if the graph contains the target
    fn contains(&self, target: &Target) -> bool {
        self.all_targets().contains(target)
    }
}

/// A dependency graph for targets
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph, edges run dependency -> dependent
    graph: DiGraph<Target, ()>,

    /// Map from target to node index
    node_map: HashMap<Target, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from `(target, dependencies)` pairs
    ///
    /// All targets are added before any edge, so dependencies may refer to
    /// targets declared later in the sequence.
    pub fn from_adjacency<I, T, D>(entries: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (T, D)>,
        T: Into<Target>,
        D: IntoIterator,
        D::Item: Into<Target>,
    {
        let mut graph = Self::new();

        let entries: Vec<(Target, Vec<Target>)> = entries
            .into_iter()
            .map(|(target, deps)| (target.into(), deps.into_iter().map(Into::into).collect()))
            .collect();

        for (target, _) in &entries {
            if !graph.add_target(target.clone()) {
                return Err(GraphError::DuplicateTarget(target.clone()));
            }
        }

        for (target, deps) in &entries {
            for dep in deps {
                graph.add_dependency(target, dep)?;
            }
        }

        Ok(graph)
    }

    /// Adds a target to the graph, returning false if it was already present
    pub fn add_target(&mut self, target: Target) -> bool {
        if self.node_map.contains_key(&target) {
            return false;
        }
        let idx = self.graph.add_node(target.clone());
        self.node_map.insert(target, idx);
        true
    }

    /// Adds a dependency edge: `target` depends on `depends_on`
    ///
    /// Adding the same edge twice is a no-op.
    pub fn add_dependency(&mut self, target: &Target, depends_on: &Target) -> Result<(), GraphError> {
        let target_idx = *self
            .node_map
            .get(target)
            .ok_or_else(|| GraphError::TargetNotFound(target.clone()))?;

        let dep_idx = *self
            .node_map
            .get(depends_on)
            .ok_or_else(|| GraphError::TargetNotFound(depends_on.clone()))?;

        if self.graph.find_edge(dep_idx, target_idx).is_none() {
            self.graph.add_edge(dep_idx, target_idx, ());
        }

        Ok(())
    }

    /// Returns the direct dependents of a target (targets that depend on it)
    pub fn dependents(&self, target: &Target) -> Vec<Target> {
        self.neighbors(target, Direction::Outgoing)
    }

    fn neighbors(&self, target: &Target, direction: Direction) -> Vec<Target> {
        let idx = match self.node_map.get(target) {
            Some(idx) => *idx,
            None => return vec![],
        };

        // petgraph yields the most recently added edge first
        let mut targets: Vec<Target> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        targets.reverse();
        targets
    }

    /// Returns the number of targets in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphProvider for DependencyGraph {
    fn dependencies(&self, target: &Target) -> Vec<Target> {
        self.neighbors(target, Direction::Incoming)
    }

    fn all_targets(&self) -> Vec<Target> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    fn contains(&self, target: &Target) -> bool {
        self.node_map.contains_key(target)
    }
}
