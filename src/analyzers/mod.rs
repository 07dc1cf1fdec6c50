//! Independent analyzers, each a pure function from the operation slice
//! to a list of candidate dependencies. Analyzers never see each other's
//! output and never mutate the operations they are given; all conflicts
//! are reconciled afterward by [`crate::graph::conflict`].

pub mod constraint;
pub mod crud;
pub mod logical;
pub mod nested_resource;
pub mod parameter_flow;

use crate::model::{Dependency, Operation};

/// Runs every analyzer in turn over `operations` and concatenates their
/// candidate lists. Order here does not matter for correctness (conflict
/// resolution is order-independent given the kind priority table), only
/// for how candidates are initially grouped before sorting.
pub fn run_all(operations: &[Operation]) -> Vec<Dependency> {
    let mut candidates = Vec::new();
    candidates.extend(parameter_flow::analyze(operations));
    candidates.extend(crud::analyze(operations));
    candidates.extend(logical::analyze(operations));
    candidates.extend(nested_resource::analyze(operations));
    candidates.extend(constraint::analyze(operations));
    candidates
}
