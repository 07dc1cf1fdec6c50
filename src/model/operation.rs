use indexmap::IndexSet;
use serde_json::Value;

use crate::method::Method;

/// One HTTP method at one path in the analyzed document.
///
/// Built once by the reader and never mutated by the core pipeline; the
/// optional dynamic layer is the only thing allowed to grow `consumes` or
/// `produces` after the initial build.
#[derive(Debug, Clone)]
pub struct Operation {
    pub operation_id: String,
    pub method: Method,
    pub path: String,
    pub resource_type: Option<String>,
    pub consumes: IndexSet<String>,
    pub produces: IndexSet<String>,
    pub path_params: IndexSet<String>,
    pub security: Vec<String>,
    pub tags: Vec<String>,
    pub annotations: indexmap::IndexMap<String, Value>,
}

impl Operation {
    pub fn new(operation_id: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Operation {
            operation_id: operation_id.into(),
            method,
            path: path.into(),
            resource_type: None,
            consumes: IndexSet::new(),
            produces: IndexSet::new(),
            path_params: IndexSet::new(),
            security: Vec::new(),
            tags: Vec::new(),
            annotations: indexmap::IndexMap::new(),
        }
    }

    /// A POST, a PUT, or a GET with path parameters: the operations
    /// downstream test tooling is most interested in exercising directly.
    pub fn is_interesting(&self) -> bool {
        matches!(self.method, Method::Post | Method::Put)
            || (self.method == Method::Get && !self.path_params.is_empty())
    }

    /// True once the logical analyzer has classified this operation as a
    /// terminal (logout-style) step; sequencing treats it as a sink.
    pub fn is_terminal(&self) -> bool {
        self.annotations
            .get("terminal")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Membership test for the string-array annotations the reader
    /// populates as a side channel (`optional_params`, `enum_params`,
    /// `ambiguous_produces`).
    pub fn annotation_contains(&self, key: &str, value: &str) -> bool {
        self.annotations
            .get(key)
            .and_then(Value::as_array)
            .is_some_and(|arr| arr.iter().any(|v| v.as_str() == Some(value)))
    }

    /// Non-`{...}` path segments, in order, used by the CRUD analyzer's
    /// prefix comparison and by the nested-resource analyzer.
    pub fn static_segments(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty() && !is_path_param_segment(segment))
            .collect()
    }
}

pub(crate) fn is_path_param_segment(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Derives `resource_type` per the contract in §4.1: the last non-`{...}`
/// path segment, or `None` for `/` (and for paths with no static segment
/// at all, e.g. `/{id}`).
pub fn resource_type_of(path: &str) -> Option<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && !is_path_param_segment(segment))
        .next_back()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_is_last_static_segment() {
        assert_eq!(resource_type_of("/pet/{petId}"), Some("pet".to_owned()));
        assert_eq!(
            resource_type_of("/store/order/{orderId}"),
            Some("order".to_owned())
        );
        assert_eq!(resource_type_of("/"), None);
    }

    #[test]
    fn interesting_operations() {
        let mut get_with_param = Operation::new("getPet", Method::Get, "/pet/{petId}");
        get_with_param.path_params.insert("petId".to_owned());
        assert!(get_with_param.is_interesting());

        let get_without_param = Operation::new("listPets", Method::Get, "/pet");
        assert!(!get_without_param.is_interesting());

        let post = Operation::new("createPet", Method::Post, "/pet");
        assert!(post.is_interesting());
    }
}
