//! # Pipeline Events
//!
//! Lifecycle events streamed to the caller while a run progresses. The HTTP
//! layer turns these into server-sent events; the pipeline knows nothing
//! about the transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stages::PipelineStage;

/// Kind of pipeline event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// Run accepted
    Start,
    /// A stage began
    StepStart,
    /// A stage finished
    StepComplete,
    /// A finished slide
    SlideData,
    /// Emitted right after the matching `SlideData`
    SlideComplete,
    /// Validation found errors (non-fatal)
    ValidationError,
    /// A refinement pass began
    RefinementStart,
    /// Intra-stage progress
    Progress,
    /// Run failed or was cancelled
    Error,
    /// Run finished
    Done,
}

/// An event in the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Kind of event
    #[serde(rename = "type")]
    pub kind: PipelineEventKind,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Payload, shape depends on `kind`
    #[serde(default)]
    pub data: serde_json::Value,
}

impl PipelineEvent {
    /// Create a new event
    pub fn new(kind: PipelineEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            data: serde_json::Value::Null,
        }
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Set one field of an object payload, replacing a null payload
    pub fn with_data_field(mut self, key: &str, value: serde_json::Value) -> Self {
        if self.data.is_null() {
            self.data = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.data.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn step_start(stage: PipelineStage) -> Self {
        Self::new(PipelineEventKind::StepStart).with_data(serde_json::json!({
            "step": stage,
            "message": stage.start_message(),
        }))
    }

    pub fn step_complete(stage: PipelineStage, data: serde_json::Value) -> Self {
        Self::new(PipelineEventKind::StepComplete).with_data(serde_json::json!({
            "step": stage,
            "data": data,
        }))
    }

    /// Stage this event refers to, for step and progress events
    pub fn step(&self) -> Option<&str> {
        self.data.get("step").and_then(serde_json::Value::as_str)
    }
}
