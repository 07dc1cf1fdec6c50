//! Transitive reduction: drops any edge `(u, v)` for which some other path
//! from `u` to `v` already exists, leaving the unique minimum edge set with
//! the same reachability relation. There is no direct petgraph equivalent
//! of `networkx.transitive_reduction`, so this reimplements it directly:
//! tentatively remove each edge and keep the removal iff `u` can still
//! reach `v` without it.

use crate::graph::Graph;

pub fn transitive_reduce(graph: &mut Graph) {
    let edges: Vec<_> = graph.inner.edge_indices().collect();
    let mut removed = 0;
    for edge in edges {
        let Some((source, target)) = graph.inner.edge_endpoints(edge) else {
            continue;
        };
        let weight = graph
            .inner
            .remove_edge(edge)
            .expect("edge_indices() only yields indices present in the graph");
        if petgraph::algo::has_path_connecting(&graph.inner, source, target, None) {
            removed += 1;
        } else {
            graph.inner.add_edge(source, target, weight);
        }
    }
    if removed > 0 {
        log::debug!("transitive reduction removed {removed} redundant edges");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, DependencyKind};

    #[test]
    fn redundant_shortcut_edge_is_removed() {
        let mut graph = Graph::new(vec![
            crate::model::Operation::new("a", crate::method::Method::Get, "/a"),
            crate::model::Operation::new("b", crate::method::Method::Get, "/b"),
            crate::model::Operation::new("c", crate::method::Method::Get, "/c"),
        ]);
        assert!(graph.add_dependency_if_acyclic(Dependency::new("a", "b", DependencyKind::Crud, 0.9)));
        assert!(graph.add_dependency_if_acyclic(Dependency::new("b", "c", DependencyKind::Crud, 0.9)));
        assert!(graph.add_dependency_if_acyclic(Dependency::new("a", "c", DependencyKind::Crud, 0.9)));
        assert_eq!(graph.edge_count(), 3);

        transitive_reduce(&mut graph);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_path("a", "c"));
        assert!(!graph.inner.edge_weights().any(|d| d.source == "a" && d.target == "c"));
    }
}
