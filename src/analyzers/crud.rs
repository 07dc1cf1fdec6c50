//! Creator-before-reader/updater/deleter ordering within a resource.

use std::collections::HashMap;

use crate::{
    method::Method,
    model::{operation::is_path_param_segment, Dependency, DependencyKind, Operation},
};

/// A POST whose path's last segment is not a path parameter and has no
/// path parameter before it — distinguishes `POST /pet` (a create) from
/// `POST /pet/{id}/uploadImage` (an action on an existing resource).
fn is_true_create(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.split_last() {
        None => false,
        Some((last, rest)) => {
            !is_path_param_segment(last) && !rest.iter().any(|s| is_path_param_segment(s))
        }
    }
}

fn crud_related(a: &Operation, b: &Operation) -> bool {
    if a.resource_type != b.resource_type {
        return false;
    }
    let sa = a.static_segments();
    let sb = b.static_segments();
    sa == sb || sa.starts_with(&sb) || sb.starts_with(&sa)
}

pub fn analyze(operations: &[Operation]) -> Vec<Dependency> {
    let mut by_resource: HashMap<&str, Vec<&Operation>> = HashMap::new();
    for op in operations {
        if let Some(resource) = op.resource_type.as_deref() {
            by_resource.entry(resource).or_default().push(op);
        }
    }

    let mut dependencies = Vec::new();
    let mut resources: Vec<&&str> = by_resource.keys().collect();
    resources.sort_unstable();
    for resource in resources {
        let ops = &by_resource[*resource];
        let creates: Vec<&&Operation> = ops
            .iter()
            .filter(|op| op.method == Method::Post && is_true_create(&op.path))
            .collect();
        let reads: Vec<&&Operation> = ops.iter().filter(|op| op.method == Method::Get).collect();
        let updates: Vec<&&Operation> = ops
            .iter()
            .filter(|op| {
                matches!(op.method, Method::Put | Method::Patch)
                    || (op.method == Method::Post && !is_true_create(&op.path))
            })
            .collect();
        let deletes: Vec<&&Operation> =
            ops.iter().filter(|op| op.method == Method::Delete).collect();

        let others = reads.iter().chain(updates.iter()).chain(deletes.iter());
        for create in &creates {
            for other in others.clone() {
                if create.operation_id == other.operation_id {
                    continue;
                }
                if !crud_related(create, other) {
                    continue;
                }
                dependencies.push(
                    Dependency::new(
                        create.operation_id.clone(),
                        other.operation_id.clone(),
                        DependencyKind::Crud,
                        0.9,
                    )
                    .with_reason(format!(
                        "{} creates the resource {} operates on",
                        create.operation_id, other.operation_id
                    )),
                );
            }
        }

        for read in &reads {
            for update in &updates {
                if read.operation_id == update.operation_id {
                    continue;
                }
                if !crud_related(read, update) {
                    continue;
                }
                dependencies.push(
                    Dependency::new(
                        read.operation_id.clone(),
                        update.operation_id.clone(),
                        DependencyKind::Crud,
                        0.6,
                    )
                    .with_reason(format!(
                        "{} reads state that {} may depend on",
                        read.operation_id, update.operation_id
                    )),
                );
            }
        }
    }
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_true_create_from_action() {
        assert!(is_true_create("/pet"));
        assert!(!is_true_create("/pet/{id}/uploadImage"));
        assert!(!is_true_create("/pet/{id}"));
    }

    #[test]
    fn simple_crud_pet_scenario() {
        let mut create_pet = Operation::new("createPet", Method::Post, "/pet");
        create_pet.resource_type = Some("pet".to_owned());
        let mut get_pet = Operation::new("getPet", Method::Get, "/pet/{petId}");
        get_pet.resource_type = Some("pet".to_owned());
        let mut update_pet = Operation::new("updatePet", Method::Put, "/pet/{petId}");
        update_pet.resource_type = Some("pet".to_owned());
        let mut delete_pet = Operation::new("deletePet", Method::Delete, "/pet/{petId}");
        delete_pet.resource_type = Some("pet".to_owned());

        let deps = analyze(&[create_pet, get_pet, update_pet, delete_pet]);
        let crud_from_create: Vec<_> = deps.iter().filter(|d| d.source == "createPet").collect();
        assert_eq!(crud_from_create.len(), 3);
        assert!(deps.iter().any(|d| d.source == "getPet" && d.target == "updatePet"));
    }
}
