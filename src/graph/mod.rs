//! The DAG itself: an arena of operations plus a labeled adjacency built
//! and mutated by [`builder`], minimized by [`reduce`], inspected through
//! [`query`], and optionally adjusted at runtime by [`dynamic`].

pub mod builder;
pub mod conflict;
pub mod dynamic;
pub mod query;
pub mod reduce;

use indexmap::IndexMap;
use petgraph::{graph::NodeIndex, prelude::DiGraph};

use crate::{graph::dynamic::AliasDiscovery, model::{Dependency, Operation}};

/// Per-node metadata (the Operation) lives once in `operations`, keyed by
/// id; `inner` stores only ids plus edge weights, per the arena/index
/// model in the design notes.
pub struct Graph {
    pub(crate) operations: IndexMap<String, Operation>,
    pub(crate) inner: DiGraph<String, Dependency>,
    pub(crate) index: IndexMap<String, NodeIndex>,
    pub(crate) rejected_cycles: u32,
    pub(crate) alias_discovery: AliasDiscovery,
}

impl Graph {
    pub fn new(operations: Vec<Operation>) -> Self {
        let mut by_id: Vec<(String, Operation)> =
            operations.into_iter().map(|op| (op.operation_id.clone(), op)).collect();
        by_id.sort_by(|a, b| a.0.cmp(&b.0));

        let mut inner = DiGraph::new();
        let mut index = IndexMap::new();
        let mut operations = IndexMap::new();
        for (id, op) in by_id {
            let node = inner.add_node(id.clone());
            index.insert(id.clone(), node);
            operations.insert(id, op);
        }
        Graph { operations, inner, index, rejected_cycles: 0, alias_discovery: AliasDiscovery::new() }
    }

    pub fn operation(&self, id: &str) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn operation_mut(&mut self, id: &str) -> Option<&mut Operation> {
        self.operations.get_mut(id)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn contains_operation(&self, id: &str) -> bool {
        self.operations.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Dependency> {
        self.inner.edge_weights()
    }

    fn node_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// True iff a directed path exists from `from` to `to` (inclusive of
    /// the trivial zero-length path when `from == to`).
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let (Some(a), Some(b)) = (self.node_of(from), self.node_of(to)) else {
            return false;
        };
        petgraph::algo::has_path_connecting(&self.inner, a, b, None)
    }

    /// Admits `dep` iff it is not a self-loop and does not close a cycle
    /// (`target ⇒* source` does not already hold). Returns whether the
    /// edge was admitted.
    pub fn add_dependency_if_acyclic(&mut self, dep: Dependency) -> bool {
        if dep.source == dep.target {
            return false;
        }
        let Some(&source) = self.index.get(&dep.source) else {
            return false;
        };
        let Some(&target) = self.index.get(&dep.target) else {
            return false;
        };
        if petgraph::algo::has_path_connecting(&self.inner, target, source, None) {
            self.rejected_cycles += 1;
            return false;
        }
        self.inner.add_edge(source, target, dep);
        true
    }

    /// Diagnostic post-condition: any remaining simple cycles in the
    /// graph. Always empty on a correctly built graph; kept so tests and
    /// the build report can assert it directly instead of trusting the
    /// builder blindly.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        use petgraph::algo::kosaraju_scc;
        kosaraju_scc(&self.inner)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|n| self.inner[n].clone()).collect())
            .collect()
    }
}
