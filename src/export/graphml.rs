//! Minimal GraphML export for tools (yEd, Gephi) that read it directly.

use std::fmt::Write;

use crate::graph::Graph;

pub fn export(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
    out.push_str("  <key id=\"kind\" for=\"edge\" attr.name=\"kind\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"confidence\" for=\"edge\" attr.name=\"confidence\" attr.type=\"double\"/>\n");
    out.push_str("  <key id=\"path\" for=\"node\" attr.name=\"path\" attr.type=\"string\"/>\n");
    out.push_str("  <graph id=\"dependencies\" edgedefault=\"directed\">\n");

    let mut operation_ids: Vec<&str> = graph.operations().map(|op| op.operation_id.as_str()).collect();
    operation_ids.sort_unstable();
    for id in &operation_ids {
        let op = graph.operation(id).expect("id came from this graph");
        let _ = writeln!(out, "    <node id=\"{}\">", escape(id));
        let _ = writeln!(out, "      <data key=\"path\">{}</data>", escape(&op.path));
        out.push_str("    </node>\n");
    }
    for (i, dep) in super::sorted_edges(graph).into_iter().enumerate() {
        let _ = writeln!(
            out,
            "    <edge id=\"e{i}\" source=\"{}\" target=\"{}\">",
            escape(&dep.source),
            escape(&dep.target)
        );
        let _ = writeln!(out, "      <data key=\"kind\">{}</data>", dep.kind.as_str());
        let _ = writeln!(out, "      <data key=\"confidence\">{}</data>", dep.confidence);
        out.push_str("    </edge>\n");
    }
    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    #[test]
    fn renders_well_formed_nodes_and_edges() {
        let mut graph = Graph::new(vec![
            Operation::new("a", Method::Post, "/a"),
            Operation::new("b", Method::Get, "/b"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("a", "b", DependencyKind::Crud, 0.9));
        let xml = export(&graph);
        assert!(xml.contains("source=\"a\" target=\"b\""));
        assert!(xml.starts_with("<?xml"));
    }
}
