//! Read-only query surface: per-operation dependency lookup, a linear
//! execution sequence for a target operation, and an aggregate summary by
//! kind. `has_path` and `detect_cycles` live directly on [`Graph`].

use std::collections::{HashSet, BTreeMap};

use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};

use crate::{
    graph::Graph,
    model::{Dependency, DependencyKind},
};

impl Graph {
    /// Edges admitted into the graph with `op` as the target, i.e. the
    /// operations that must run before `op`. Restricts to `kind` when given.
    pub fn dependencies_of(&self, op: &str, kind: Option<DependencyKind>) -> Vec<&Dependency> {
        let Some(&node) = self.index.get(op) else {
            return Vec::new();
        };
        self.inner
            .edges_directed(node, Direction::Incoming)
            .map(|e| e.weight())
            .filter(|dep| kind.is_none_or(|k| dep.kind == k))
            .collect()
    }

    /// A topologically valid execution order covering `target` and every
    /// operation it transitively depends on. `None` if `target` is unknown.
    pub fn sequence_to(&self, target: &str) -> Option<Vec<String>> {
        let target_node = *self.index.get(target)?;

        let mut ancestors: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![target_node];
        while let Some(node) = stack.pop() {
            for edge in self.inner.edges_directed(node, Direction::Incoming) {
                let source = edge.source();
                if ancestors.insert(source) {
                    stack.push(source);
                }
            }
        }
        ancestors.insert(target_node);

        let order = petgraph::algo::toposort(&self.inner, None).ok()?;
        Some(
            order
                .into_iter()
                .filter(|node| ancestors.contains(node))
                .map(|node| self.inner[node].clone())
                .collect(),
        )
    }

    /// Edge counts grouped by kind, in priority order, for the build report
    /// and the HTML export. Every kind appears, including those with zero
    /// admitted edges, so a reader can tell "never fired" from "not shown".
    pub fn summary_by_kind(&self) -> BTreeMap<DependencyKind, usize> {
        use strum::VariantArray;
        let mut counts: BTreeMap<DependencyKind, usize> =
            DependencyKind::VARIANTS.iter().map(|kind| (*kind, 0)).collect();
        for dep in self.edges() {
            *counts.entry(dep.kind).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    use super::*;

    fn small_graph() -> Graph {
        let mut graph = Graph::new(vec![
            Operation::new("create", Method::Post, "/pet"),
            Operation::new("read", Method::Get, "/pet/{id}"),
            Operation::new("update", Method::Put, "/pet/{id}"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("create", "read", DependencyKind::Crud, 0.9));
        graph.add_dependency_if_acyclic(Dependency::new("read", "update", DependencyKind::Crud, 0.6));
        graph
    }

    #[test]
    fn sequence_to_update_includes_full_chain_in_order() {
        let graph = small_graph();
        let sequence = graph.sequence_to("update").unwrap();
        let create_pos = sequence.iter().position(|id| id == "create").unwrap();
        let read_pos = sequence.iter().position(|id| id == "read").unwrap();
        let update_pos = sequence.iter().position(|id| id == "update").unwrap();
        assert!(create_pos < read_pos);
        assert!(read_pos < update_pos);
    }

    #[test]
    fn dependencies_of_returns_only_incoming_edges() {
        let graph = small_graph();
        let deps = graph.dependencies_of("read", None);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].source, "create");
        assert!(graph.dependencies_of("create", None).is_empty());
    }

    #[test]
    fn summary_by_kind_counts_admitted_edges() {
        let graph = small_graph();
        let summary = graph.summary_by_kind();
        assert_eq!(summary.get(&DependencyKind::Crud), Some(&2));
    }
}
