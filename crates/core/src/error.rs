//! # Pipeline Errors
//!
//! Failures that abort a run. Validation findings are data, not errors, and
//! never appear here.

use thiserror::Error;

use crate::pipeline::PipelineStage;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected before any event was emitted
    #[error("invalid pipeline config: {0}")]
    InvalidConfig(String),

    /// The cancellation token fired between stages
    #[error("generation cancelled")]
    Cancelled,

    /// A model or transport call failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: anyhow::Error,
    },

    /// The model answered with JSON that does not match the requested schema
    #[error("{stage} stage returned output that does not match the {schema} schema: {source}")]
    Schema {
        stage: PipelineStage,
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage} stage returned an empty {what}")]
    EmptyResponse {
        stage: PipelineStage,
        what: &'static str,
    },
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }

    /// Stage the failure happened in, if it happened inside one
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::Stage { stage, .. }
            | PipelineError::Schema { stage, .. }
            | PipelineError::EmptyResponse { stage, .. } => Some(*stage),
            PipelineError::InvalidConfig(_) | PipelineError::Cancelled => None,
        }
    }
}
