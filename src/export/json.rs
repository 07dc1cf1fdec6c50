//! The canonical graph JSON sink: bit-exact per the documented schema —
//! `nodes`, `edges`, and a `metadata` summary — so downstream consumers
//! can rely on field names without re-reading this module.

use serde_json::{json, Value};

use crate::graph::Graph;

pub fn export(graph: &Graph) -> Value {
    let mut operation_ids: Vec<&str> = graph.operations().map(|op| op.operation_id.as_str()).collect();
    operation_ids.sort_unstable();

    let nodes: Vec<Value> = operation_ids
        .into_iter()
        .map(|id| {
            let op = graph.operation(id).expect("id came from this graph");
            json!({
                "id": op.operation_id,
                "path": op.path,
                "method": op.method.as_str(),
                "resource_type": op.resource_type,
                "consumes": op.consumes,
                "produces": op.produces,
                "is_interesting": op.is_interesting(),
                "annotations": op.annotations,
            })
        })
        .collect();

    let edges: Vec<Value> = super::sorted_edges(graph)
        .into_iter()
        .map(|dep| {
            json!({
                "source": dep.source,
                "target": dep.target,
                "type": dep.kind.as_str(),
                "confidence": dep.confidence,
                "parameter_mapping": dep.parameter_mapping,
                "reason": dep.reason,
                "verified": dep.verified,
            })
        })
        .collect();

    json!({
        "nodes": nodes,
        "edges": edges,
        "metadata": {
            "num_operations": graph.node_count(),
            "num_dependencies": graph.edge_count(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    #[test]
    fn export_is_stable_regardless_of_insertion_order() {
        let mut graph = Graph::new(vec![
            Operation::new("b", Method::Get, "/b"),
            Operation::new("a", Method::Post, "/a"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("a", "b", DependencyKind::Crud, 0.9));

        let exported = export(&graph);
        let nodes = exported["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["id"], "a");
        assert_eq!(nodes[1]["id"], "b");
        assert_eq!(exported["edges"][0]["type"], "crud");
        assert_eq!(exported["metadata"]["num_operations"], 2);
        assert_eq!(exported["metadata"]["num_dependencies"], 1);
    }

    #[test]
    fn node_carries_interesting_flag_and_sets() {
        let mut post = Operation::new("createPet", Method::Post, "/pet");
        post.consumes.insert("name".to_owned());
        post.produces.insert("id".to_owned());
        let graph = Graph::new(vec![post]);

        let exported = export(&graph);
        let node = &exported["nodes"][0];
        assert_eq!(node["is_interesting"], true);
        assert_eq!(node["consumes"][0], "name");
        assert_eq!(node["produces"][0], "id");
    }
}
