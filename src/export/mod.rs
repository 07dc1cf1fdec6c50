//! Serializations of a built [`crate::graph::Graph`] for downstream
//! consumers: the graph JSON and annotated OpenAPI document described by
//! the external interfaces, plus DOT, GraphML, and HTML for visualization.

pub mod annotated;
pub mod dot;
pub mod graphml;
pub mod html;
pub mod json;

use crate::model::Dependency;

/// Edges in a stable, deterministic order: by source, then target, then
/// kind. Every sink shares this so two runs over the same input produce
/// byte-identical output (see the determinism property in SPEC_FULL.md).
pub(crate) fn sorted_edges(graph: &crate::graph::Graph) -> Vec<&Dependency> {
    let mut edges: Vec<&Dependency> = graph.edges().collect();
    edges.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then(a.target.cmp(&b.target))
            .then(a.kind.as_str().cmp(b.kind.as_str()))
    });
    edges
}
