//! Dependency-ordered traversal
//!
//! Walks the graph depth-first from each root and emits every reachable
//! target once, after all of its dependencies. The walk uses an explicit
//! stack so deep chains cannot overflow the call stack, and tracks targets
//! that are still being expanded to detect cycles.

use std::collections::HashMap;
use std::vec;

use thiserror::Error;

use super::graph::GraphProvider;
use super::target::Target;

#[derive(Debug, Error, PartialEq)]
pub enum TraversalError {
    #[error("Dependency cycle detected: {dependent} depends on {target}, which is already on the dependency path")]
    Cycle { target: Target, dependent: Target },

    #[error("Target not found: {0}")]
    UnknownRoot(Target),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Dependencies are still being visited
    Active,
    /// Emitted into the result
    Done,
}

struct Frame {
    target: Target,
    pending: vec::IntoIter<Target>,
}

impl Frame {
    fn open<G: GraphProvider + ?Sized>(graph: &G, target: Target) -> Self {
        let pending = graph.dependencies(&target).into_iter();
        Self { target, pending }
    }
}

/// Returns the targets reachable from `roots`, dependencies first
///
/// Each target appears once, at the position where it was first finished.
/// Roots are processed in the given order and share one visited set, so a
/// target reachable from several roots is emitted only for the first.
/// An empty `roots` slice yields an empty result.
pub fn traverse<G: GraphProvider + ?Sized>(
    graph: &G,
    roots: &[Target],
) -> Result<Vec<Target>, TraversalError> {
    let mut marks: HashMap<Target, Mark> = HashMap::new();
    let mut order = Vec::new();

    for root in roots {
        if !graph.contains(root) {
            return Err(TraversalError::UnknownRoot(root.clone()));
        }
        if marks.contains_key(root) {
            continue;
        }

        marks.insert(root.clone(), Mark::Active);
        let mut stack = vec![Frame::open(graph, root.clone())];

        while let Some(frame) = stack.last_mut() {
            match frame.pending.next() {
                Some(dep) => match marks.get(&dep) {
                    Some(Mark::Done) => {}
                    Some(Mark::Active) => {
                        return Err(TraversalError::Cycle {
                            target: dep,
                            dependent: frame.target.clone(),
                        });
                    }
                    None => {
                        marks.insert(dep.clone(), Mark::Active);
                        stack.push(Frame::open(graph, dep));
                    }
                },
                None => {
                    if let Some(done) = stack.pop() {
                        marks.insert(done.target.clone(), Mark::Done);
                        order.push(done.target);
                    }
                }
            }
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGraph;

    fn t(name: &str) -> Target {
        Target::new(name)
    }

    fn names(targets: &[Target]) -> Vec<&str> {
        targets.iter().map(|t| t.name()).collect()
    }

    fn diamond() -> DependencyGraph {
        DependencyGraph::from_adjacency([
            ("A", vec![]),
            ("B", vec!["A"]),
            ("C", vec!["A"]),
            ("D", vec!["B", "C"]),
        ])
        .unwrap()
    }

    #[test]
    fn diamond_from_top() {
        let order = traverse(&diamond(), &[t("D")]).unwrap();
        assert_eq!(names(&order), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn leaf_root_yields_itself() {
        let order = traverse(&diamond(), &[t("A")]).unwrap();
        assert_eq!(names(&order), vec!["A"]);
    }

    #[test]
    fn empty_roots_yield_nothing() {
        let order = traverse(&diamond(), &[]).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn shared_dependencies_emitted_once() {
        let graph = diamond();
        let order = traverse(&graph, &[t("B"), t("C"), t("D")]).unwrap();
        assert_eq!(names(&order), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn root_that_is_also_a_dependency() {
        let graph = diamond();
        let order = traverse(&graph, &[t("D"), t("A")]).unwrap();
        assert_eq!(names(&order), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn repeated_roots_are_skipped() {
        let graph = diamond();
        let order = traverse(&graph, &[t("B"), t("B")]).unwrap();
        assert_eq!(names(&order), vec!["A", "B"]);
    }

    #[test]
    fn all_targets_as_roots() {
        let graph = DependencyGraph::from_adjacency([("A", vec![]), ("B", vec!["A"])]).unwrap();
        let order = traverse(&graph, &graph.all_targets()).unwrap();
        assert_eq!(names(&order), vec!["A", "B"]);
    }

    #[test]
    fn two_cycle_is_detected() {
        let graph = DependencyGraph::from_adjacency([("X", vec!["Y"]), ("Y", vec!["X"])]).unwrap();

        let err = traverse(&graph, &[t("X")]).unwrap_err();
        assert_eq!(
            err,
            TraversalError::Cycle {
                target: t("X"),
                dependent: t("Y"),
            }
        );
    }

    #[test]
    fn three_cycle_names_the_closing_edge() {
        let graph = DependencyGraph::from_adjacency([
            ("X", vec!["Y"]),
            ("Y", vec!["Z"]),
            ("Z", vec!["X"]),
        ])
        .unwrap();

        let err = traverse(&graph, &[t("X")]).unwrap_err();
        assert_eq!(
            err,
            TraversalError::Cycle {
                target: t("X"),
                dependent: t("Z"),
            }
        );
        assert_eq!(
            err.to_string(),
            "Dependency cycle detected: Z depends on X, which is already on the dependency path"
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let graph = DependencyGraph::from_adjacency([("X", vec!["X"])]).unwrap();
        assert!(matches!(
            traverse(&graph, &[t("X")]),
            Err(TraversalError::Cycle { .. })
        ));
    }

    #[test]
    fn cycle_below_an_acyclic_prefix() {
        let graph = DependencyGraph::from_adjacency([
            ("top", vec!["mid"]),
            ("mid", vec!["low"]),
            ("low", vec!["mid"]),
            ("other", vec![]),
        ])
        .unwrap();

        assert!(traverse(&graph, &[t("other")]).is_ok());
        assert!(matches!(
            traverse(&graph, &[t("other"), t("top")]),
            Err(TraversalError::Cycle { .. })
        ));
    }

    #[test]
    fn unknown_root_is_rejected() {
        let err = traverse(&diamond(), &[t("Z")]).unwrap_err();
        assert_eq!(err, TraversalError::UnknownRoot(t("Z")));
    }

    #[test]
    fn traversal_is_repeatable() {
        let graph = diamond();
        let roots = graph.all_targets();
        let first = traverse(&graph, &roots).unwrap();
        let second = traverse(&graph, &roots).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("t{i}")).collect();
        let entries = ids.iter().enumerate().map(|(i, name)| {
            let deps = if i == 0 { vec![] } else { vec![ids[i - 1].clone()] };
            (name.clone(), deps)
        });
        let graph = DependencyGraph::from_adjacency(entries).unwrap();

        let order = traverse(&graph, &[Target::new("t19999")]).unwrap();
        assert_eq!(order.len(), 20_000);
        assert_eq!(order[0].name(), "t0");
    }
}
