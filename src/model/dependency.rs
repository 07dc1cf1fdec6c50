use indexmap::IndexMap;

use crate::model::kind::DependencyKind;

/// Tri-state verification flag. Starts `Unknown` and is only ever set by
/// the optional dynamic layer once an execution confirms or refutes an
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verified {
    Unknown,
    True,
    False,
}

/// A directed edge admitted to the graph: "source must run before target".
#[derive(Debug, Clone)]
pub struct Dependency {
    pub source: String,
    pub target: String,
    pub kind: DependencyKind,
    pub confidence: f64,
    pub parameter_mapping: IndexMap<String, String>,
    pub reason: Option<String>,
    pub constraint: Option<String>,
    pub verified: Verified,
    pub(crate) success_count: u32,
    pub(crate) failure_count: u32,
}

impl Dependency {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: DependencyKind,
        confidence: f64,
    ) -> Self {
        Dependency {
            source: source.into(),
            target: target.into(),
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            parameter_mapping: IndexMap::new(),
            reason: None,
            constraint: None,
            verified: Verified::Unknown,
            success_count: 0,
            failure_count: 0,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_mapping(mut self, source_name: impl Into<String>, target_name: impl Into<String>) -> Self {
        self.parameter_mapping
            .insert(source_name.into(), target_name.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Key used to group same-direction candidates during conflict
    /// resolution, and as the graph's edge identity.
    pub fn pair(&self) -> (&str, &str) {
        (self.source.as_str(), self.target.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        let dep = Dependency::new("a", "b", DependencyKind::Crud, 1.5);
        assert_eq!(dep.confidence, 1.0);
        let dep = Dependency::new("a", "b", DependencyKind::Crud, -0.5);
        assert_eq!(dep.confidence, 0.0);
    }
}
