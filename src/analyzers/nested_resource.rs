//! Parent-path creator before child-path operation: if some POST's path
//! equals a prefix of another operation's path, the POST must run first.

use std::collections::HashMap;

use crate::{
    method::Method,
    model::{Dependency, DependencyKind, Operation},
};

/// All path prefixes `/s1`, `/s1/s2`, ..., excluding the full path itself.
fn prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    (1..segments.len())
        .map(|i| format!("/{}", segments[..i].join("/")))
        .collect()
}

pub fn analyze(operations: &[Operation]) -> Vec<Dependency> {
    let mut posts_by_path: HashMap<&str, &Operation> = HashMap::new();
    for op in operations {
        if op.method == Method::Post {
            posts_by_path.insert(op.path.as_str(), op);
        }
    }

    let mut dependencies = Vec::new();
    for op in operations {
        for prefix in prefixes(&op.path) {
            let Some(&creator) = posts_by_path.get(prefix.as_str()) else {
                continue;
            };
            if creator.operation_id == op.operation_id {
                continue;
            }
            dependencies.push(
                Dependency::new(
                    creator.operation_id.clone(),
                    op.operation_id.clone(),
                    DependencyKind::NestedResource,
                    0.85,
                )
                .with_reason(format!(
                    "{} creates the parent resource at {prefix}",
                    creator.operation_id
                )),
            );
        }
    }
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_creator_precedes_child_operation() {
        let create_pet = Operation::new("createPet", Method::Post, "/pet");
        let upload_image = Operation::new("uploadImage", Method::Post, "/pet/{petId}/uploadImage");
        let deps = analyze(&[create_pet, upload_image]);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].source, "createPet");
        assert_eq!(deps[0].target, "uploadImage");
    }
}
