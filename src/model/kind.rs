use std::fmt::Display;

/// The reason an edge was admitted to the dependency graph.
///
/// Ordering between kinds is not derived automatically: [`DependencyKind::priority`]
/// is the single source of truth for conflict resolution and must not be
/// reimplemented elsewhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::VariantArray, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    ParameterData,
    Crud,
    Authentication,
    Authorization,
    NestedResource,
    Workflow,
    Constraint,
    Transitive,
    Dynamic,
}

impl DependencyKind {
    /// Lower value wins conflicts. This table is referenced from exactly
    /// one place (here); analyzers and the conflict resolver call this
    /// function rather than keeping their own copy.
    pub fn priority(&self) -> u8 {
        match self {
            DependencyKind::Crud => 0,
            DependencyKind::Authentication | DependencyKind::Authorization => 1,
            DependencyKind::Workflow | DependencyKind::NestedResource => 2,
            DependencyKind::Constraint => 3,
            DependencyKind::ParameterData => 4,
            DependencyKind::Transitive | DependencyKind::Dynamic => 5,
        }
    }

    /// The snake_case rendering used by the JSON graph export's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::ParameterData => "parameter_data",
            DependencyKind::Crud => "crud",
            DependencyKind::Authentication => "authentication",
            DependencyKind::Authorization => "authorization",
            DependencyKind::NestedResource => "nested_resource",
            DependencyKind::Workflow => "workflow",
            DependencyKind::Constraint => "constraint",
            DependencyKind::Transitive => "transitive",
            DependencyKind::Dynamic => "dynamic",
        }
    }
}

impl Ord for DependencyKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for DependencyKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crud_outranks_parameter_data() {
        assert!(DependencyKind::Crud.priority() < DependencyKind::ParameterData.priority());
    }

    #[test]
    fn dynamic_and_transitive_share_lowest_priority() {
        assert_eq!(
            DependencyKind::Dynamic.priority(),
            DependencyKind::Transitive.priority()
        );
    }
}
