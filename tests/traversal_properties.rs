//! Property tests for dependency traversal over random acyclic graphs

use std::collections::{HashMap, HashSet};

use gwf_graph::domain::{traverse, DependencyGraph, GraphProvider, Target, TraversalError};
use proptest::prelude::*;
use proptest::sample::Index;

/// Node `i` may only depend on nodes with a lower index, so the graph is acyclic
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<Index>>> {
    prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), 1..40)
}

fn build(raw: &[Vec<Index>]) -> DependencyGraph {
    let entries: Vec<(String, Vec<String>)> = raw
        .iter()
        .enumerate()
        .map(|(i, deps)| {
            let deps = if i == 0 {
                Vec::new()
            } else {
                deps.iter().map(|d| format!("t{}", d.index(i))).collect()
            };
            (format!("t{i}"), deps)
        })
        .collect();
    DependencyGraph::from_adjacency(entries).unwrap()
}

fn pick_roots(graph: &DependencyGraph, picks: &[Index]) -> Vec<Target> {
    let all = graph.all_targets();
    picks.iter().map(|p| all[p.index(all.len())].clone()).collect()
}

fn reachable(graph: &DependencyGraph, roots: &[Target]) -> HashSet<Target> {
    let mut seen = HashSet::new();
    let mut stack: Vec<Target> = roots.to_vec();
    while let Some(target) = stack.pop() {
        if seen.insert(target.clone()) {
            stack.extend(graph.dependencies(&target));
        }
    }
    seen
}

proptest! {
    #[test]
    fn visits_each_reachable_target_once(
        raw in dag_strategy(),
        picks in prop::collection::vec(any::<Index>(), 0..5),
    ) {
        let graph = build(&raw);
        let roots = pick_roots(&graph, &picks);

        let visited = traverse(&graph, &roots).unwrap();

        let unique: HashSet<Target> = visited.iter().cloned().collect();
        prop_assert_eq!(unique.len(), visited.len());
        prop_assert_eq!(unique, reachable(&graph, &roots));
    }

    #[test]
    fn dependencies_come_before_dependents(
        raw in dag_strategy(),
        picks in prop::collection::vec(any::<Index>(), 1..5),
    ) {
        let graph = build(&raw);
        let roots = pick_roots(&graph, &picks);

        let visited = traverse(&graph, &roots).unwrap();
        let position: HashMap<&Target, usize> =
            visited.iter().enumerate().map(|(i, t)| (t, i)).collect();

        for target in &visited {
            for dep in graph.dependencies(target) {
                prop_assert!(position[&dep] < position[target]);
            }
        }
    }

    #[test]
    fn traversal_is_repeatable(
        raw in dag_strategy(),
        picks in prop::collection::vec(any::<Index>(), 1..5),
    ) {
        let graph = build(&raw);
        let roots = pick_roots(&graph, &picks);

        prop_assert_eq!(traverse(&graph, &roots).unwrap(), traverse(&graph, &roots).unwrap());
    }

    #[test]
    fn closing_a_chain_is_a_cycle(len in 2usize..30) {
        let entries: Vec<(String, Vec<String>)> = (0..len)
            .map(|i| (format!("t{i}"), vec![format!("t{}", (i + 1) % len)]))
            .collect();
        let graph = DependencyGraph::from_adjacency(entries).unwrap();

        let result = traverse(&graph, &[Target::new("t0")]);
        let is_cycle = matches!(result, Err(TraversalError::Cycle { .. }));
        prop_assert!(is_cycle);
    }
}
