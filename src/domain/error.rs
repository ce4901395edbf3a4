use crate::parser::{ParseError, ValidationError};
use crate::pipeline::export::ExportError;
use crate::scoring::ScoringError;
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for a classification run.
///
/// Every variant is fatal: the run stops and the session keeps whatever
/// result it published before the run started.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(#[from] ScoringError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Failed to read upload {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload superseded by a newer upload")]
    StaleUpload,

    #[error("Run cancelled")]
    Cancelled,
}

/// A prediction whose identifier matched no uploaded row.
///
/// Non-fatal: the prediction is dropped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationWarning {
    pub transit_id: String,
}

impl std::fmt::Display for CorrelationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row not found in upload for transit_id: {}", self.transit_id)
    }
}
