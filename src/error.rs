//! Error taxonomy for the reader and pipeline. Fatal variants abort a
//! build; non-fatal ones are recorded in the build report and logged
//! (see `log::warn!` call sites in `openapi` and `graph::builder`).

use thiserror::Error;

/// The primary error type returned by the reader and the pipeline.
#[derive(Debug, Error)]
pub enum OasDagError {
    /// The document could not be read, was not valid YAML/JSON, or has no
    /// top-level `paths`. Fatal; no graph is produced.
    #[error("input error: {0}")]
    Input(String),

    /// Two extracted operations share an `operation_id`. Fatal, since the
    /// operation model requires unique identity.
    #[error("operation id collision: {0}")]
    OperationIdCollision(String),

    /// `record_execution` was called with an operation id the graph does
    /// not know about. Non-fatal to the process, but the call itself
    /// fails and the graph is left unchanged.
    #[error("unknown operation id in dynamic update: {0}")]
    DynamicInputError(String),
}

/// Non-fatal condition recorded during a build rather than raised as an
/// error. Collected into the build report instead of aborting.
#[derive(Debug, Clone)]
pub enum Warning {
    /// An unresolved `$ref` was encountered; the schema subtree under it
    /// contributed no property names.
    UnresolvedReference { location: String, reference: String },
    /// An analyzer could not be run and its contribution was skipped.
    AnalyzerFailure { analyzer: &'static str, detail: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnresolvedReference { location, reference } => write!(
                f,
                "unresolved reference {reference} at {location}, skipping subtree"
            ),
            Warning::AnalyzerFailure { analyzer, detail } => {
                write!(f, "analyzer {analyzer} failed, skipping its candidates: {detail}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, OasDagError>;
