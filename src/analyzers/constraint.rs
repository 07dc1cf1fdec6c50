//! Enum-constrained parameters induce an ordering: the operation that
//! declares the enum is considered authoritative for every other
//! operation on the same resource. Range, pattern, and conditional-schema
//! constraints are declared as hooks but are intentionally no-ops; their
//! absence must not affect correctness (see the open questions recorded
//! in DESIGN.md).

use std::collections::HashMap;

use crate::model::{Dependency, DependencyKind, Operation};

pub fn analyze(operations: &[Operation]) -> Vec<Dependency> {
    let mut dependencies = enum_constraints(operations);
    dependencies.extend(range_constraints(operations));
    dependencies.extend(pattern_constraints(operations));
    dependencies.extend(conditional_schema_constraints(operations));
    dependencies
}

fn enum_constraints(operations: &[Operation]) -> Vec<Dependency> {
    let mut by_resource: HashMap<&str, Vec<&Operation>> = HashMap::new();
    for op in operations {
        if let Some(resource) = op.resource_type.as_deref() {
            by_resource.entry(resource).or_default().push(op);
        }
    }

    let mut dependencies = Vec::new();
    for op in operations {
        let Some(resource) = op.resource_type.as_deref() else {
            continue;
        };
        let Some(enum_params) = op.annotations.get("enum_params").and_then(|v| v.as_array()) else {
            continue;
        };
        let mut names: Vec<&str> = enum_params.iter().filter_map(|v| v.as_str()).collect();
        names.sort_unstable();
        for name in names {
            for other in &by_resource[resource] {
                if other.operation_id == op.operation_id {
                    continue;
                }
                dependencies.push(
                    Dependency::new(
                        op.operation_id.clone(),
                        other.operation_id.clone(),
                        DependencyKind::Constraint,
                        0.6,
                    )
                    .with_constraint(format!("enum:{name}"))
                    .with_reason(format!(
                        "{} declares an enum constraint on '{name}' shared with {resource}",
                        op.operation_id
                    )),
                );
            }
        }
    }
    dependencies
}

/// Hook for range (`minimum`/`maximum`) constraints. No ordering signal
/// is currently derived from numeric ranges alone.
fn range_constraints(_operations: &[Operation]) -> Vec<Dependency> {
    Vec::new()
}

/// Hook for `pattern` constraints.
fn pattern_constraints(_operations: &[Operation]) -> Vec<Dependency> {
    Vec::new()
}

/// Hook for schemas whose validity depends on another field's value
/// (`oneOf`/`discriminator`-style conditionals).
fn conditional_schema_constraints(_operations: &[Operation]) -> Vec<Dependency> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn enum_declaring_operation_links_to_siblings() {
        let mut setter = Operation::new("setStatus", Method::Put, "/pet/{id}/status");
        setter.resource_type = Some("pet".to_owned());
        setter.annotations.insert(
            "enum_params".to_owned(),
            serde_json::json!(["status"]),
        );
        let mut getter = Operation::new("getPet", Method::Get, "/pet/{id}");
        getter.resource_type = Some("pet".to_owned());

        let deps = analyze(&[setter, getter]);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].constraint.as_deref(), Some("enum:status"));
    }
}
