//! Error types for a single document analysis

use shared_docx::DocxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Cannot read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: DocxError,
    },

    #[error("Reference index not ready: {0}")]
    IndexNotReady(String),

    #[error("Failed to write {path}: {reason}")]
    Output { path: String, reason: String },

    #[error("Analysis of {path} exceeded {secs}s")]
    Timeout { path: String, secs: u64 },
}

impl AnalysisError {
    pub(crate) fn output(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        AnalysisError::Output {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
