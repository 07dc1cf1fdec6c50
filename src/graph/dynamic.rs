//! Optional runtime feedback: confirming or refuting statically inferred
//! edges by actually executing an operation, growing `produces` from
//! observed responses, and discovering parameter aliases the static
//! reader could never see (two differently-named parameters that
//! repeatedly carry the same value across live executions).

use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;
use petgraph::Direction;
use petgraph::visit::EdgeRef;
use serde_json::Value;

use crate::{
    error::{OasDagError, Result},
    graph::Graph,
    model::{Dependency, DependencyKind, Verified},
};

const FAILURE_REMOVAL_THRESHOLD: u32 = 10;
const ALIAS_WINDOW: usize = 5;
const ALIAS_SIMILARITY_THRESHOLD: f64 = 0.8;
const DYNAMIC_EDGE_CONFIDENCE: f64 = 0.8;

impl Graph {
    /// Records the outcome of actually executing `op_id` with `parameters`,
    /// confirming or eroding confidence in every edge that already points
    /// at it, and — on success — growing the graph from what `response`
    /// reveals.
    ///
    /// On success: dotted property names found in `response` are added to
    /// `op_id`'s `produces`; any name newly discovered this way that some
    /// other operation already `consumes` spawns a `Dynamic` edge at
    /// confidence 0.8 (subject to the usual acyclic admission check); every
    /// edge incoming to `op_id` has its confidence multiplied by 1.1
    /// (clamped to 1.0) and is marked `verified = True`. The call's
    /// parameters are also fed into the alias-discovery window, and any
    /// alias found is recorded on both operations' annotations.
    ///
    /// On failure: every edge incoming to `op_id` has its confidence
    /// multiplied by 0.9 (floored at 0.1); an edge that accumulates 10
    /// failures is dropped entirely rather than kept at a floor confidence
    /// no one trusts.
    pub fn record_execution(
        &mut self,
        op_id: &str,
        success: bool,
        response: &Value,
        parameters: &HashMap<String, Value>,
    ) -> Result<()> {
        let Some(&node) = self.index.get(op_id) else {
            return Err(OasDagError::DynamicInputError(op_id.to_owned()));
        };

        if success {
            self.grow_produces_and_spawn_edges(op_id, response);
            if let Some(op) = self.operations.get_mut(op_id) {
                for name in parameters.keys() {
                    record_successful_param(op, name);
                }
            }

            let incoming: Vec<_> = self.inner.edges_directed(node, Direction::Incoming).map(|e| e.id()).collect();
            for edge_id in incoming {
                let dep = &mut self.inner[edge_id];
                dep.success_count += 1;
                dep.failure_count = 0;
                dep.confidence = (dep.confidence * 1.1).min(1.0);
                dep.verified = Verified::True;
                log::debug!("execution of {op_id} confirmed {} -> {op_id}, confidence now {:.2}", dep.source, dep.confidence);
            }

            self.alias_discovery.observe(op_id, parameters);
            let aliases = self.alias_discovery.discover_aliases();
            record_parameter_aliases(self, &aliases);
        } else {
            let incoming: Vec<_> = self.inner.edges_directed(node, Direction::Incoming).map(|e| e.id()).collect();
            let mut to_remove = Vec::new();
            for edge_id in incoming {
                let dep = &mut self.inner[edge_id];
                dep.failure_count += 1;
                dep.confidence = (dep.confidence * 0.9).max(0.1);
                dep.verified = Verified::False;
                log::debug!("execution of {op_id} refuted {} -> {op_id}, confidence now {:.2}", dep.source, dep.confidence);
                if dep.failure_count >= FAILURE_REMOVAL_THRESHOLD {
                    to_remove.push(edge_id);
                }
            }
            for edge_id in to_remove {
                let (source, _) = self.inner.edge_endpoints(edge_id).expect("edge_id came from this graph");
                log::warn!(
                    "dropping {} -> {op_id} after {FAILURE_REMOVAL_THRESHOLD} failures",
                    self.inner[source]
                );
                self.inner.remove_edge(edge_id);
            }
        }
        Ok(())
    }

    fn grow_produces_and_spawn_edges(&mut self, op_id: &str, response: &Value) {
        let mut discovered = IndexSet::new();
        flatten_names(response, "", &mut discovered);

        let newly_produced: Vec<String> = {
            let op = self.operations.get(op_id).expect("op_id was checked by the caller");
            discovered.into_iter().filter(|name| !op.produces.contains(name)).collect()
        };
        if newly_produced.is_empty() {
            return;
        }
        if let Some(op) = self.operations.get_mut(op_id) {
            op.produces.extend(newly_produced.iter().cloned());
        }

        for name in &newly_produced {
            let consumers: Vec<String> = self
                .operations
                .values()
                .filter(|op| op.operation_id != op_id && op.consumes.contains(name))
                .map(|op| op.operation_id.clone())
                .collect();
            for consumer in consumers {
                let dep = Dependency::new(op_id, consumer, DependencyKind::Dynamic, DYNAMIC_EDGE_CONFIDENCE)
                    .with_mapping(name.clone(), name.clone())
                    .with_reason(format!("discovered at runtime: {name}"));
                self.add_dependency_if_acyclic(dep);
            }
        }
    }
}

/// Flattens a JSON response's object keys into dotted paths, mirroring the
/// reader's schema walk but over actual response data rather than a
/// schema definition. Descends into arrays without adding a path segment.
fn flatten_names(value: &Value, prefix: &str, out: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let dotted = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                out.insert(dotted.clone());
                flatten_names(nested, &dotted, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_names(item, prefix, out);
            }
        }
        _ => {}
    }
}

/// Observes the parameter values an operation was actually called with
/// across a bounded window of live executions, looking for two
/// differently-named parameters that consistently carry the same value –
/// evidence of an alias the static parameter-flow analyzer, which only
/// compares names, cannot see.
#[derive(Default)]
pub struct AliasDiscovery {
    window: VecDeque<HashMap<(String, String), Value>>,
}

impl AliasDiscovery {
    pub fn new() -> Self {
        AliasDiscovery { window: VecDeque::new() }
    }

    /// Records one execution's parameter values, keyed by name. Keeps only
    /// the most recent `ALIAS_WINDOW` executions.
    pub fn observe(&mut self, operation_id: &str, params: &HashMap<String, Value>) {
        let mut snapshot = HashMap::new();
        for (name, value) in params {
            snapshot.insert((operation_id.to_owned(), name.clone()), value.clone());
        }
        self.window.push_back(snapshot);
        while self.window.len() > ALIAS_WINDOW {
            self.window.pop_front();
        }
    }

    /// Pairs of `(operation_id, param_name)` that agreed on value in every
    /// execution where both were observed, across at least two executions.
    pub fn discover_aliases(&self) -> Vec<((String, String), (String, String))> {
        let mut keys: Vec<(String, String)> =
            self.window.iter().flat_map(|snapshot| snapshot.keys().cloned()).collect();
        keys.sort();
        keys.dedup();

        let mut aliases = Vec::new();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (a, b) = (&keys[i], &keys[j]);
                if a.0 == b.0 {
                    continue;
                }
                let mut agreements = 0;
                let mut comparisons = 0;
                for snapshot in &self.window {
                    if let (Some(va), Some(vb)) = (snapshot.get(a), snapshot.get(b)) {
                        comparisons += 1;
                        if va == vb {
                            agreements += 1;
                        }
                    }
                }
                if comparisons >= 2 && (agreements as f64 / comparisons as f64) >= ALIAS_SIMILARITY_THRESHOLD {
                    aliases.push((a.clone(), b.clone()));
                }
            }
        }
        aliases
    }
}

/// Records each discovered alias pair as a mutual annotation on both
/// operations involved (`operation.annotations["parameter_aliases"]`,
/// mapping a parameter name to the `operation_id.parameter_name` strings
/// it has been observed to agree with) rather than as a graph edge — an
/// alias is evidence about parameter identity, not an execution-order
/// dependency.
fn record_parameter_aliases(graph: &mut Graph, aliases: &[((String, String), (String, String))]) {
    for ((op_a, param_a), (op_b, param_b)) in aliases {
        if op_a == op_b {
            continue;
        }
        if let Some(op) = graph.operation_mut(op_a) {
            add_parameter_alias(op, param_a, &format!("{op_b}.{param_b}"));
        }
        if let Some(op) = graph.operation_mut(op_b) {
            add_parameter_alias(op, param_b, &format!("{op_a}.{param_a}"));
        }
    }
}

/// Appends `name` to the `successful_params` annotation, the per-operation
/// record of which parameters were actually supplied in a successful live
/// execution — consulted by the annotated-export's `Success` strategy flag.
fn record_successful_param(op: &mut crate::model::Operation, name: &str) {
    let entry = op
        .annotations
        .entry("successful_params".to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(arr) = entry else { return };
    let value = Value::String(name.to_owned());
    if !arr.contains(&value) {
        arr.push(value);
    }
}

fn add_parameter_alias(op: &mut crate::model::Operation, param: &str, other: &str) {
    let entry = op
        .annotations
        .entry("parameter_aliases".to_owned())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    let Value::Object(by_param) = entry else { return };
    let arr = by_param.entry(param.to_owned()).or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(others) = arr else { return };
    let other_value = Value::String(other.to_owned());
    if !others.contains(&other_value) {
        others.push(other_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{method::Method, model::Operation};

    fn graph_with_one_edge() -> Graph {
        let mut graph = Graph::new(vec![
            Operation::new("create", Method::Post, "/pet"),
            Operation::new("read", Method::Get, "/pet/{id}"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("create", "read", DependencyKind::Crud, 0.5));
        graph
    }

    #[test]
    fn successful_execution_raises_confidence_and_verifies() {
        let mut graph = graph_with_one_edge();
        graph
            .record_execution("read", true, &Value::Null, &HashMap::new())
            .unwrap();
        let dep = graph.dependencies_of("read", None)[0];
        assert!((dep.confidence - 0.55).abs() < 1e-9);
        assert_eq!(dep.verified, Verified::True);
    }

    #[test]
    fn repeated_failures_remove_the_edge() {
        let mut graph = graph_with_one_edge();
        for _ in 0..FAILURE_REMOVAL_THRESHOLD {
            graph
                .record_execution("read", false, &Value::Null, &HashMap::new())
                .unwrap();
        }
        assert!(graph.dependencies_of("read", None).is_empty());
    }

    #[test]
    fn unknown_operation_is_a_dynamic_input_error() {
        let mut graph = graph_with_one_edge();
        assert!(graph.record_execution("nope", true, &Value::Null, &HashMap::new()).is_err());
    }

    #[test]
    fn response_growth_spawns_a_dynamic_edge_to_a_new_consumer() {
        let mut delete = Operation::new("delete", Method::Delete, "/pet/{id}");
        delete.consumes.insert("id".to_owned());
        let mut graph = Graph::new(vec![
            Operation::new("create", Method::Post, "/pet"),
            delete,
        ]);

        let response = serde_json::json!({ "id": 7 });
        graph
            .record_execution("create", true, &response, &HashMap::new())
            .unwrap();

        assert!(graph.operation("create").unwrap().produces.contains("id"));
        let deps = graph.dependencies_of("delete", Some(DependencyKind::Dynamic));
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].source, "create");
    }

    #[test]
    fn consistent_value_agreement_is_recorded_as_a_mutual_annotation() {
        let mut graph = Graph::new(vec![
            Operation::new("createPet", Method::Post, "/pet"),
            Operation::new("getPet", Method::Get, "/pet/{id}"),
        ]);

        for _ in 0..3 {
            let mut params = HashMap::new();
            params.insert("petId".to_owned(), Value::from(42));
            graph.record_execution("createPet", true, &Value::Null, &params).unwrap();
            let mut params = HashMap::new();
            params.insert("id".to_owned(), Value::from(42));
            graph.record_execution("getPet", true, &Value::Null, &params).unwrap();
        }

        let create = graph.operation("createPet").unwrap();
        let aliases = create
            .annotations
            .get("parameter_aliases")
            .and_then(|v| v.get("petId"))
            .and_then(|v| v.as_array())
            .expect("createPet.petId should have a recorded alias");
        assert!(aliases.iter().any(|v| v == "getPet.id"));
    }
}
