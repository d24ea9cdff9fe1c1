//! Root selection by name pattern
//!
//! Patterns use shell-style globbing (`*`, `?`, `[...]`). With no patterns,
//! every target in the graph is a root.

use glob::Pattern;
use thiserror::Error;

use super::graph::GraphProvider;
use super::target::Target;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("The workflow does not define any targets")]
    NoTargets,

    #[error("No targets match: {}", .0.join(" "))]
    NoMatch(Vec<String>),

    #[error("Invalid target pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Selects the traversal roots for a set of name patterns
///
/// Roots keep the graph's declaration order regardless of the order the
/// patterns were given in. An empty selection is an error: there is nothing
/// to render.
pub fn select_roots<G: GraphProvider + ?Sized>(
    graph: &G,
    patterns: &[String],
) -> Result<Vec<Target>, SelectionError> {
    let targets = graph.all_targets();
    if targets.is_empty() {
        return Err(SelectionError::NoTargets);
    }

    if patterns.is_empty() {
        return Ok(targets);
    }

    let compiled = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| SelectionError::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let selected: Vec<Target> = targets
        .into_iter()
        .filter(|t| compiled.iter().any(|p| p.matches(t.name())))
        .collect();

    if selected.is_empty() {
        return Err(SelectionError::NoMatch(patterns.to_vec()));
    }

    Ok(selected)
}
