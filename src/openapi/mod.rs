//! Reads an OpenAPI v3 document and extracts the [`Operation`] model the
//! rest of the pipeline consumes. This module is the concrete
//! implementation of the "opaque source" the core pipeline is specified
//! against: callers that already have another v3 parser can skip it and
//! hand `Operation`s to [`crate::pipeline::build`] directly.

use std::{collections::HashSet, fs};

use indexmap::IndexSet;
use oas3::{
    Spec,
    spec::{
        ObjectOrReference, ObjectSchema, Operation as SpecOperation, Parameter, ParameterIn,
        PathItem, Schema, SchemaType,
    },
};

use crate::{
    error::{OasDagError, Result, Warning},
    method::Method,
    model::operation::{resource_type_of, Operation},
};

/// Loads and parses an OpenAPI v3 document from `path`. YAML and JSON are
/// both accepted; `oas3`'s YAML loader handles both since JSON is a
/// subset of YAML.
pub fn load_spec(path: &std::path::Path) -> Result<Spec> {
    let text = fs::read_to_string(path)
        .map_err(|e| OasDagError::Input(format!("cannot read {}: {e}", path.display())))?;
    let spec: Spec = oas3::from_yaml(&text)
        .map_err(|e| OasDagError::Input(format!("cannot parse {}: {e}", path.display())))?;
    if spec.paths.is_none() {
        return Err(OasDagError::Input(format!(
            "{} has no top-level `paths`",
            path.display()
        )));
    }
    Ok(spec)
}

type MethodAccessor = fn(&PathItem) -> &Option<SpecOperation>;

const METHODS: [(Method, MethodAccessor); 7] = [
    (Method::Get, |p| &p.get),
    (Method::Post, |p| &p.post),
    (Method::Put, |p| &p.put),
    (Method::Patch, |p| &p.patch),
    (Method::Delete, |p| &p.delete),
    (Method::Head, |p| &p.head),
    (Method::Options, |p| &p.options),
];

/// Walks `paths` × the seven supported methods and produces one
/// [`Operation`] per declared method, plus any non-fatal warnings
/// encountered while resolving schemas. Fails only if two operations end
/// up sharing an `operation_id`.
pub fn extract_operations(spec: &Spec) -> Result<(Vec<Operation>, Vec<Warning>)> {
    let mut operations = Vec::new();
    let mut warnings = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    let paths = spec.paths.clone().unwrap_or_default();
    for (path, path_item) in paths {
        for (method, accessor) in METHODS {
            let Some(spec_op) = accessor(&path_item) else {
                continue;
            };
            let operation_id = spec_op
                .operation_id
                .clone()
                .unwrap_or_else(|| format!("{method}_{}", path.replace('/', "_")));
            if !seen_ids.insert(operation_id.clone()) {
                return Err(OasDagError::OperationIdCollision(operation_id));
            }

            let mut operation = Operation::new(operation_id.clone(), method, path.clone());
            operation.resource_type = resource_type_of(&path);
            operation.tags = spec_op.tags.clone();
            operation.security = spec_op
                .security
                .iter()
                .flat_map(|r| r.0.keys().cloned())
                .collect();

            extract_parameters(spec, &path_item, spec_op, &mut operation);
            extract_request_body(spec, spec_op, &mut operation, &mut warnings, &operation_id);
            extract_responses(spec, spec_op, &mut operation, &mut warnings, &operation_id);

            operations.push(operation);
        }
    }

    operations.sort_by(|a, b| a.operation_id.cmp(&b.operation_id));
    Ok((operations, warnings))
}

fn extract_parameters(
    spec: &Spec,
    path_item: &PathItem,
    spec_op: &SpecOperation,
    operation: &mut Operation,
) {
    let params = path_item.parameters.iter().chain(spec_op.parameters.iter());
    for param_ref in params {
        let Ok(param) = param_ref.resolve(spec) else {
            continue;
        };
        operation.consumes.insert(param.name.clone());
        if param.location == ParameterIn::Path {
            operation.path_params.insert(param.name.clone());
        }
        if !param.required.unwrap_or(false) {
            record_into(operation, "optional_params", &param.name);
        }
        if has_enum_constraint(spec, &param) {
            record_into(operation, "enum_params", &param.name);
        }
    }
}

fn has_enum_constraint(spec: &Spec, param: &Parameter) -> bool {
    param
        .schema
        .as_ref()
        .and_then(|s| s.resolve(spec).ok())
        .is_some_and(|schema| !schema.enum_values.is_empty())
}

/// Appends `value` to the string array annotation named `key`, creating it
/// if absent. Used to stash side-channel facts (optional/enum parameter
/// names, ambiguous producers) the analyzers consult without widening the
/// `Operation` struct itself for every such fact.
fn record_into(operation: &mut Operation, key: &str, value: &str) {
    let entry = operation
        .annotations
        .entry(key.to_owned())
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    if let serde_json::Value::Array(arr) = entry {
        arr.push(serde_json::Value::String(value.to_owned()));
    }
}

fn extract_request_body(
    spec: &Spec,
    spec_op: &SpecOperation,
    operation: &mut Operation,
    warnings: &mut Vec<Warning>,
    operation_id: &str,
) {
    let Some(body_ref) = spec_op.request_body.as_ref() else {
        return;
    };
    let Ok(body) = body_ref.resolve(spec) else {
        warnings.push(Warning::UnresolvedReference {
            location: format!("{operation_id}.requestBody"),
            reference: "requestBody".to_owned(),
        });
        return;
    };
    for media_type in body.content.values() {
        let Some(schema_ref) = media_type.schema.as_ref() else {
            continue;
        };
        let mut visited = HashSet::new();
        let names = collect_property_names(
            spec,
            schema_ref,
            "",
            &mut visited,
            warnings,
            &format!("{operation_id}.requestBody"),
        );
        operation.consumes.extend(names);
    }
}

fn extract_responses(
    spec: &Spec,
    spec_op: &SpecOperation,
    operation: &mut Operation,
    warnings: &mut Vec<Warning>,
    operation_id: &str,
) {
    let Some(responses) = spec_op.responses.as_ref() else {
        return;
    };
    // Tracked per status code (not per media type within a status) so the
    // parameter-flow analyzer can tell a name offered by exactly one
    // response from one offered ambiguously by several.
    let mut occurrences: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    for (status, response_ref) in responses {
        let Ok(response) = response_ref.resolve(spec) else {
            warnings.push(Warning::UnresolvedReference {
                location: format!("{operation_id}.responses.{status}"),
                reference: status.clone(),
            });
            continue;
        };
        let mut names_this_status = IndexSet::new();
        for media_type in response.content.values() {
            let Some(schema_ref) = media_type.schema.as_ref() else {
                continue;
            };
            let mut visited = HashSet::new();
            let names = collect_property_names(
                spec,
                schema_ref,
                "",
                &mut visited,
                warnings,
                &format!("{operation_id}.responses.{status}"),
            );
            names_this_status.extend(names);
        }
        for name in &names_this_status {
            *occurrences.entry(name.clone()).or_insert(0) += 1;
        }
        operation.produces.extend(names_this_status);
    }
    for (name, count) in occurrences {
        if count > 1 {
            record_into(operation, "ambiguous_produces", &name);
        }
    }
}

/// Recursively flattens an object schema's property names into dotted
/// paths (`a.b.c` for nested objects), descending into array `items`
/// without adding a path segment. `$ref`s are cut only against the
/// currently active descent path (`visited` is pushed before recursing
/// into a ref and popped once that recursion returns), so two sibling
/// properties that both `$ref` the same schema each still contribute —
/// only an actual cycle back onto the stack is suppressed.
fn collect_property_names(
    spec: &Spec,
    schema_ref: &ObjectOrReference<ObjectSchema>,
    prefix: &str,
    visited: &mut HashSet<String>,
    warnings: &mut Vec<Warning>,
    location: &str,
) -> IndexSet<String> {
    let mut out = IndexSet::new();
    let ref_path = match schema_ref {
        ObjectOrReference::Ref { ref_path, .. } => {
            if !visited.insert(ref_path.clone()) {
                return out;
            }
            Some(ref_path.clone())
        }
        ObjectOrReference::Object(_) => None,
    };

    let Ok(schema) = schema_ref.resolve(spec) else {
        warnings.push(Warning::UnresolvedReference {
            location: location.to_owned(),
            reference: ref_name(schema_ref),
        });
        if let Some(ref_path) = &ref_path {
            visited.remove(ref_path);
        }
        return out;
    };
    collect_from_object_schema(spec, &schema, prefix, visited, warnings, location, &mut out);
    if let Some(ref_path) = &ref_path {
        visited.remove(ref_path);
    }
    out
}

fn ref_name(schema_ref: &ObjectOrReference<ObjectSchema>) -> String {
    match schema_ref {
        ObjectOrReference::Ref { ref_path, .. } => ref_path.clone(),
        ObjectOrReference::Object(_) => String::new(),
    }
}

fn collect_from_object_schema(
    spec: &Spec,
    schema: &ObjectSchema,
    prefix: &str,
    visited: &mut HashSet<String>,
    warnings: &mut Vec<Warning>,
    location: &str,
    out: &mut IndexSet<String>,
) {
    for (name, prop_ref) in &schema.properties {
        let dotted = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        out.insert(dotted.clone());
        let nested = collect_property_names(spec, prop_ref, &dotted, visited, warnings, location);
        out.extend(nested);
    }

    let is_array = schema
        .schema_type
        .as_ref()
        .is_some_and(|t| t.contains(SchemaType::Array));
    if is_array {
        if let Some(items) = &schema.items {
            match items.as_ref() {
                Schema::Object(inner) => {
                    let nested =
                        collect_property_names(spec, inner, prefix, visited, warnings, location);
                    out.extend(nested);
                }
                Schema::Boolean(_) => {}
            }
        }
    }

    // `allOf` with a single branch is common for "base + extension" schemas;
    // fold its properties into this level rather than dropping them.
    if schema.properties.is_empty() && schema.all_of.len() == 1 {
        let nested =
            collect_property_names(spec, &schema.all_of[0], prefix, visited, warnings, location);
        out.extend(nested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_table_covers_seven_verbs() {
        assert_eq!(METHODS.len(), 7);
    }

    #[test]
    fn sibling_refs_to_the_same_schema_both_expand() {
        let yaml = "\
openapi: 3.0.0
info: { title: t, version: '1' }
paths: {}
components:
  schemas:
    Address:
      type: object
      properties:
        city: { type: string }
    Shipment:
      type: object
      properties:
        origin: { $ref: '#/components/schemas/Address' }
        destination: { $ref: '#/components/schemas/Address' }
";
        let spec: Spec = oas3::from_yaml(yaml).unwrap();
        let schema_ref = ObjectOrReference::Ref { ref_path: "#/components/schemas/Shipment".to_owned() };
        let mut visited = HashSet::new();
        let mut warnings = Vec::new();
        let names = collect_property_names(&spec, &schema_ref, "", &mut visited, &mut warnings, "test");
        assert!(names.contains("origin.city"));
        assert!(names.contains("destination.city"));
        assert!(visited.is_empty());
    }
}
