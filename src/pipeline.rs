//! Glues the reader to the graph builder: load a document, extract
//! operations, build the conflict-resolved DAG, then minimize it. This is
//! the single entry point the CLI driver (and any future embedder) calls.

use std::path::Path;
use std::time::Instant;

use crate::{
    error::Result,
    graph::{builder::BuildReport, reduce, Graph},
    openapi,
};

pub struct BuildOutcome {
    pub graph: Graph,
    pub report: BuildReport,
}

/// Runs the full static pipeline: reader -> analyzers -> conflict
/// resolution -> DAG admission -> transitive reduction.
pub fn run(spec_path: &Path) -> Result<BuildOutcome> {
    let started = Instant::now();
    log::info!("loading specification from {}", spec_path.display());
    let spec = openapi::load_spec(spec_path)?;

    let (operations, warnings) = openapi::extract_operations(&spec)?;
    log::info!("extracted {} operations in {:?}", operations.len(), started.elapsed());

    let (mut graph, report) = crate::graph::builder::build(operations, warnings);

    let reduce_started = Instant::now();
    reduce::transitive_reduce(&mut graph);
    log::info!(
        "transitive reduction left {} edges ({:?})",
        graph.edge_count(),
        reduce_started.elapsed()
    );

    log::info!("build finished in {:?}: {}", started.elapsed(), summarize(&report));
    Ok(BuildOutcome { graph, report })
}

fn summarize(report: &BuildReport) -> String {
    format!(
        "{} operations, {} candidates, {} admitted, {} cycle rejections, {} warnings",
        report.operation_count,
        report.candidate_count,
        report.admitted_count,
        report.rejected_cycle_count,
        report.warnings.len()
    )
}
