//! Orchestrates a full build: mark terminals, run every analyzer, resolve
//! conflicts, then admit the resulting candidates into a [`Graph`] in
//! priority order, rejecting self-loops and anything that would close a
//! cycle.

use crate::{
    analyzers, error::Warning, graph::conflict, graph::Graph, model::Operation,
};

/// Summary of one build, reported by the CLI driver and useful to tests
/// that want to assert on rejection counts without inspecting the graph.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub operation_count: usize,
    pub candidate_count: usize,
    pub admitted_count: usize,
    pub rejected_cycle_count: u32,
    pub warnings: Vec<Warning>,
}

/// Builds a [`Graph`] from already-extracted operations. `warnings` carries
/// anything the reader collected (unresolved `$ref`s, etc.) so the report
/// reflects the whole pipeline, not just this stage.
pub fn build(mut operations: Vec<Operation>, warnings: Vec<Warning>) -> (Graph, BuildReport) {
    analyzers::logical::mark_terminals(&mut operations);

    let operation_count = operations.len();
    log::info!("building dependency graph for {operation_count} operations");

    let candidates = analyzers::run_all(&operations);
    log::debug!("{} candidate dependencies before conflict resolution", candidates.len());
    let candidate_count = candidates.len();

    let resolved = conflict::resolve(candidates);
    log::debug!("{} dependencies after conflict resolution", resolved.len());

    let mut graph = Graph::new(operations);
    let mut admitted_count = 0;
    for dep in resolved {
        if dep.source.as_str() == dep.target.as_str() {
            continue;
        }
        if graph.add_dependency_if_acyclic(dep) {
            admitted_count += 1;
        }
    }

    let rejected_cycle_count = graph.rejected_cycles;
    if rejected_cycle_count > 0 {
        log::warn!("rejected {rejected_cycle_count} dependencies that would have closed a cycle");
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let report = BuildReport {
        operation_count,
        candidate_count,
        admitted_count,
        rejected_cycle_count,
        warnings,
    };
    (graph, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn cyclic_candidates_admit_only_the_acyclic_direction() {
        let mut create_pet = Operation::new("createPet", Method::Post, "/pet");
        create_pet.resource_type = Some("pet".to_owned());
        let mut get_pet = Operation::new("getPet", Method::Get, "/pet/{petId}");
        get_pet.resource_type = Some("pet".to_owned());
        get_pet.path_params.insert("petId".to_owned());

        let (graph, report) = build(vec![create_pet, get_pet], Vec::new());
        assert!(graph.has_path("createPet", "getPet"));
        assert!(!graph.has_path("getPet", "createPet"));
        assert!(report.admitted_count >= 1);
        assert!(graph.detect_cycles().is_empty());
    }
}
