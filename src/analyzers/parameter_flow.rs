//! Producer/consumer matching: infers `u -> v` when `u` produces a value
//! `v` consumes, scoped to avoid cross-resource noise on generic names.

use std::collections::HashMap;

use crate::{
    model::{Dependency, DependencyKind, Operation},
    normalize,
};

const GENERIC: &[&str] = &[
    "id",
    "name",
    "status",
    "type",
    "description",
    "created_at",
    "updated_at",
    "timestamp",
    "count",
    "total",
    "data",
    "result",
    "message",
    "code",
    "error",
    "success",
    "page",
    "limit",
    "offset",
];

const GLOBAL_RESOURCE: &str = "__global__";

fn resource_key(op: &Operation) -> &str {
    op.resource_type.as_deref().unwrap_or(GLOBAL_RESOURCE)
}

pub fn analyze(operations: &[Operation]) -> Vec<Dependency> {
    let mut dependencies = exact_matches(operations);
    dependencies.extend(fuzzy_matches(operations));
    dependencies
}

fn exact_matches(operations: &[Operation]) -> Vec<Dependency> {
    let mut producers: HashMap<(&str, &str), Vec<&Operation>> = HashMap::new();
    let mut consumers: HashMap<(&str, &str), Vec<&Operation>> = HashMap::new();
    for op in operations {
        let resource = resource_key(op);
        for param in &op.produces {
            producers.entry((param.as_str(), resource)).or_default().push(op);
        }
        for param in &op.consumes {
            consumers.entry((param.as_str(), resource)).or_default().push(op);
        }
    }

    let mut dependencies = Vec::new();
    let mut prod_keys: Vec<_> = producers.keys().copied().collect();
    prod_keys.sort_unstable();
    for (param_name, prod_resource) in prod_keys {
        let mut cons_keys: Vec<_> = consumers
            .keys()
            .copied()
            .filter(|(name, _)| *name == param_name)
            .collect();
        cons_keys.sort_unstable();
        for (_, cons_resource) in cons_keys {
            if !should_link_resources(param_name, prod_resource, cons_resource) {
                continue;
            }
            for producer in &producers[&(param_name, prod_resource)] {
                for consumer in &consumers[&(param_name, cons_resource)] {
                    if producer.operation_id == consumer.operation_id {
                        continue;
                    }
                    if is_semantic_backward(producer, consumer) {
                        continue;
                    }
                    let confidence = confidence_for(producer, consumer, param_name);
                    dependencies.push(
                        Dependency::new(
                            producer.operation_id.clone(),
                            consumer.operation_id.clone(),
                            DependencyKind::ParameterData,
                            confidence,
                        )
                        .with_mapping(param_name, param_name)
                        .with_reason(format!(
                            "parameter '{param_name}' produced by {} and consumed by {}",
                            producer.operation_id, consumer.operation_id
                        )),
                    );
                }
            }
        }
    }
    dependencies
}

fn should_link_resources(param_name: &str, prod_resource: &str, cons_resource: &str) -> bool {
    if prod_resource == cons_resource {
        return true;
    }
    let lower = param_name.to_lowercase();
    if GENERIC.contains(&lower.as_str()) {
        return false;
    }
    lower.ends_with("id") && lower.len() > 2
}

fn is_semantic_backward(producer: &Operation, consumer: &Operation) -> bool {
    if producer.resource_type != consumer.resource_type {
        return false;
    }
    if producer.method != crate::method::Method::Get || consumer.method != crate::method::Method::Post {
        return false;
    }
    let path_lower = consumer.path.to_lowercase();
    !["login", "logout", "search", "find"]
        .iter()
        .any(|action| path_lower.contains(action))
}

fn confidence_for(producer: &Operation, consumer: &Operation, param: &str) -> f64 {
    let mut confidence = 1.0;
    if producer.annotation_contains("ambiguous_produces", param) {
        confidence *= 0.8;
    }
    if consumer.annotation_contains("optional_params", param) {
        confidence *= 0.7;
    }
    confidence
}

fn fuzzy_matches(operations: &[Operation]) -> Vec<Dependency> {
    let mut producers: HashMap<&str, Vec<(&str, &Operation)>> = HashMap::new();
    let mut consumers: HashMap<&str, Vec<(&str, &Operation)>> = HashMap::new();
    for op in operations {
        let resource = resource_key(op);
        for param in &op.produces {
            producers.entry(resource).or_default().push((param.as_str(), op));
        }
        for param in &op.consumes {
            consumers.entry(resource).or_default().push((param.as_str(), op));
        }
    }

    let mut dependencies = Vec::new();
    let mut resources: Vec<&str> = producers.keys().copied().collect();
    resources.sort_unstable();
    for resource in resources {
        let Some(prod_list) = producers.get(resource) else {
            continue;
        };
        let Some(cons_list) = consumers.get(resource) else {
            continue;
        };
        for &(prod_param, producer) in prod_list {
            for &(cons_param, consumer) in cons_list {
                if prod_param == cons_param {
                    continue;
                }
                if producer.operation_id == consumer.operation_id {
                    continue;
                }
                if !normalize::are_variants(prod_param, cons_param) {
                    continue;
                }
                if is_semantic_backward(producer, consumer) {
                    continue;
                }
                dependencies.push(
                    Dependency::new(
                        producer.operation_id.clone(),
                        consumer.operation_id.clone(),
                        DependencyKind::ParameterData,
                        0.6,
                    )
                    .with_mapping(prod_param, cons_param)
                    .with_reason(format!("fuzzy match: '{prod_param}' -> '{cons_param}'")),
                );
            }
        }
    }
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    fn op(id: &str, method: Method, path: &str, resource: Option<&str>) -> Operation {
        let mut op = Operation::new(id, method, path);
        op.resource_type = resource.map(str::to_owned);
        op
    }

    #[test]
    fn specific_id_crosses_resources() {
        let mut create_pet = op("createPet", Method::Post, "/pet", Some("pet"));
        create_pet.produces.insert("petId".to_owned());
        let mut create_order = op("createOrder", Method::Post, "/store/order", Some("order"));
        create_order.consumes.insert("petId".to_owned());

        let deps = analyze(&[create_pet, create_order]);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].source, "createPet");
        assert_eq!(deps[0].target, "createOrder");
    }

    #[test]
    fn generic_name_does_not_cross_resources() {
        let mut create_user = op("createUser", Method::Post, "/userr", Some("userr"));
        create_user.produces.insert("id".to_owned());
        let mut create_product = op("createProduct", Method::Post, "/productt", Some("productt"));
        create_product.consumes.insert("id".to_owned());

        let deps = analyze(&[create_user, create_product]);
        assert!(deps.is_empty());
    }

    #[test]
    fn get_does_not_precede_creating_post() {
        let mut get_op = op("getR", Method::Get, "/r/{id}", Some("r"));
        get_op.produces.insert("id".to_owned());
        get_op.path_params.insert("id".to_owned());
        let mut post_op = op("createR", Method::Post, "/r", Some("r"));
        post_op.consumes.insert("id".to_owned());

        let deps = analyze(&[get_op, post_op]);
        assert!(deps.is_empty());
    }
}
