//! Static dependency-graph inference over OpenAPI v3 documents: reads a
//! specification, infers which operations must run before which others,
//! and exposes the result as a directed acyclic graph with a query
//! surface and an optional runtime-feedback layer.

pub mod analyzers;
pub mod error;
pub mod export;
pub mod graph;
pub mod method;
pub mod model;
pub mod normalize;
pub mod openapi;
pub mod pipeline;
