//! Graphviz DOT export, for `dot -Tsvg` or any other renderer that
//! understands the format.

use std::fmt::Write;

use crate::graph::Graph;

pub fn export(graph: &Graph) -> String {
    let mut out = String::from("digraph dependencies {\n");
    let mut operation_ids: Vec<&str> = graph.operations().map(|op| op.operation_id.as_str()).collect();
    operation_ids.sort_unstable();
    for id in &operation_ids {
        let _ = writeln!(out, "    \"{}\";", escape(id));
    }
    for dep in super::sorted_edges(graph) {
        let _ = writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{} ({:.2})\"];",
            escape(&dep.source),
            escape(&dep.target),
            dep.kind.as_str(),
            dep.confidence
        );
    }
    out.push_str("}\n");
    out
}

fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    #[test]
    fn renders_nodes_and_labeled_edges() {
        let mut graph = Graph::new(vec![
            Operation::new("a", Method::Post, "/a"),
            Operation::new("b", Method::Get, "/b"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("a", "b", DependencyKind::Crud, 0.9));
        let dot = export(&graph);
        assert!(dot.contains("\"a\" -> \"b\""));
        assert!(dot.contains("crud"));
    }
}
