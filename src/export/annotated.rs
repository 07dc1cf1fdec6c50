//! Re-emits the original OpenAPI document with two extensions layered on:
//! `x-operation-annotation` on every operation the graph knows about, and
//! `x-parameter-annotation` on every inline parameter of that operation.
//! Operations absent from the graph are left untouched.

use serde_yaml::{Mapping, Value};

use crate::{
    error::OasDagError,
    graph::Graph,
    model::Operation,
};

const METHODS: [&str; 7] = ["get", "post", "put", "patch", "delete", "head", "options"];

/// An edge is admitted into `dep-operations` only once live or static
/// confidence in it clears this bar; lower-confidence candidates would
/// otherwise leak speculative ordering into consumers of the annotated
/// document.
const DEP_OPERATION_CONFIDENCE_THRESHOLD: f64 = 0.7;

pub fn export(original_yaml: &str, graph: &Graph) -> Result<String, OasDagError> {
    let mut document: Value = serde_yaml::from_str(original_yaml)
        .map_err(|e| OasDagError::Input(format!("could not re-parse document for annotation: {e}")))?;

    let Some(paths) = document.get_mut("paths").and_then(Value::as_mapping_mut) else {
        return Err(OasDagError::Input("document has no top-level paths".to_owned()));
    };

    for (_, path_item) in paths.iter_mut() {
        let Some(path_item) = path_item.as_mapping_mut() else {
            continue;
        };
        for method in METHODS {
            let Some(operation) = path_item.get_mut(Value::from(method)).and_then(Value::as_mapping_mut) else {
                continue;
            };
            let Some(operation_id) = operation
                .get(Value::from("operationId"))
                .and_then(Value::as_str)
                .map(str::to_owned)
            else {
                continue;
            };
            let Some(op) = graph.operation(&operation_id) else {
                continue;
            };

            annotate_operation(operation, graph, op, &operation_id);
            annotate_parameters(operation, op);
        }
    }

    serde_yaml::to_string(&document)
        .map_err(|e| OasDagError::Input(format!("could not re-serialize annotated document: {e}")))
}

fn annotate_operation(operation: &mut Mapping, graph: &Graph, op: &Operation, operation_id: &str) {
    let mut dep_operations: Vec<&str> = graph
        .dependencies_of(operation_id, None)
        .into_iter()
        .filter(|dep| dep.confidence >= DEP_OPERATION_CONFIDENCE_THRESHOLD)
        .map(|dep| dep.source.as_str())
        .collect();
    dep_operations.sort_unstable();
    dep_operations.dedup();

    let mut entry = Mapping::new();
    entry.insert(
        Value::from("dep-operations"),
        Value::Sequence(dep_operations.into_iter().map(Value::from).collect()),
    );
    if op.is_terminal() {
        entry.insert(Value::from("term-operations"), Value::from(true));
    }
    if let Some(aliases) = op.annotations.get("parameter_aliases") {
        if let Ok(aliases_value) = serde_yaml::to_value(aliases) {
            entry.insert(Value::from("aliases"), aliases_value);
        }
    }

    operation.insert(Value::from("x-operation-annotation"), Value::Mapping(entry));
}

fn annotate_parameters(operation: &mut Mapping, op: &Operation) {
    let Some(parameters) = operation.get_mut(Value::from("parameters")).and_then(Value::as_sequence_mut) else {
        return;
    };

    for parameter in parameters.iter_mut() {
        let Some(param_mapping) = parameter.as_mapping_mut() else {
            continue;
        };
        let Some(name) = param_mapping
            .get(Value::from("name"))
            .and_then(Value::as_str)
            .map(str::to_owned)
        else {
            continue;
        };

        let has_example = param_mapping.get(Value::from("example")).is_some()
            || param_mapping
                .get(Value::from("schema"))
                .and_then(Value::as_mapping)
                .is_some_and(|schema| schema.get(Value::from("example")).is_some());

        let mut strategy = Mapping::new();
        strategy.insert(Value::from("Example"), Value::from(has_example));
        strategy.insert(Value::from("Dynamic"), Value::from(op.consumes.contains(&name)));
        strategy.insert(Value::from("Success"), Value::from(op.annotation_contains("successful_params", &name)));
        strategy.insert(
            Value::from("Mutation"),
            Value::from(if op.annotation_contains("enum_params", &name) { 1.0 } else { 0.5 }),
        );

        let mut entry = Mapping::new();
        entry.insert(Value::from("strategy"), Value::Mapping(strategy));
        if let Some(aliases) = op
            .annotations
            .get("parameter_aliases")
            .and_then(|v| v.get(&name))
            .and_then(|v| v.as_array())
        {
            let alias_seq: Vec<Value> = aliases
                .iter()
                .filter_map(|v| v.as_str())
                .map(Value::from)
                .collect();
            if !alias_seq.is_empty() {
                entry.insert(Value::from("alias"), Value::Sequence(alias_seq));
            }
        }

        param_mapping.insert(Value::from("x-parameter-annotation"), Value::Mapping(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    #[test]
    fn adds_operation_annotation_filtered_by_confidence() {
        let yaml = "paths:\n  /pet:\n    post:\n      operationId: createPet\n  /pet/{id}:\n    get:\n      operationId: getPet\n      parameters:\n        - name: id\n          in: path\n          required: true\n";
        let mut graph = Graph::new(vec![
            Operation::new("createPet", Method::Post, "/pet"),
            Operation::new("getPet", Method::Get, "/pet/{id}"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("createPet", "getPet", DependencyKind::Crud, 0.9));

        let annotated = export(yaml, &graph).unwrap();
        assert!(annotated.contains("x-operation-annotation"));
        assert!(annotated.contains("dep-operations"));
        assert!(annotated.contains("createPet"));
        assert!(annotated.contains("x-parameter-annotation"));
    }

    #[test]
    fn low_confidence_dependency_is_filtered_out() {
        let yaml = "paths:\n  /pet:\n    post:\n      operationId: createPet\n  /pet/{id}:\n    get:\n      operationId: getPet\n";
        let mut graph = Graph::new(vec![
            Operation::new("createPet", Method::Post, "/pet"),
            Operation::new("getPet", Method::Get, "/pet/{id}"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("createPet", "getPet", DependencyKind::Crud, 0.4));

        let annotated = export(yaml, &graph).unwrap();
        let document: serde_yaml::Value = serde_yaml::from_str(&annotated).unwrap();
        let dep_operations = &document["paths"]["/pet/{id}"]["get"]["x-operation-annotation"]["dep-operations"];
        assert_eq!(dep_operations.as_sequence().unwrap().len(), 0);
    }

    #[test]
    fn parameter_strategy_reflects_dynamic_and_mutation_flags() {
        let yaml = "paths:\n  /pet/{id}:\n    get:\n      operationId: getPet\n      parameters:\n        - name: id\n          in: path\n          required: true\n";
        let mut op = Operation::new("getPet", Method::Get, "/pet/{id}");
        op.consumes.insert("id".to_owned());
        op.annotations.insert("enum_params".to_owned(), serde_json::json!(["id"]));
        let graph = Graph::new(vec![op]);

        let annotated = export(yaml, &graph).unwrap();
        let document: serde_yaml::Value = serde_yaml::from_str(&annotated).unwrap();
        let strategy = &document["paths"]["/pet/{id}"]["get"]["parameters"][0]["x-parameter-annotation"]["strategy"];
        assert_eq!(strategy["Dynamic"], Value::from(true));
        assert_eq!(strategy["Mutation"], Value::from(1.0));
    }
}
