//! # Model Client
//!
//! The pipeline only ever asks for schema-constrained JSON. Raw completion
//! text never reaches it.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::error::PipelineError;
use crate::pipeline::PipelineStage;
use crate::prompts::Prompt;

/// One structured-output request
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    /// Name the schema is registered under with the provider
    pub schema_name: String,
    /// JSON Schema the response must conform to
    pub schema: serde_json::Value,
}

/// A chat model that can answer with JSON matching a schema.
///
/// Implementations are shared across concurrent runs and must not keep
/// per-run state.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the prompts and return the parsed JSON response
    async fn complete(&self, request: StructuredRequest) -> anyhow::Result<serde_json::Value>;
}

/// Ask `client` for a `T`, deriving the schema from the type itself
pub async fn request_structured<T>(
    client: &dyn ModelClient,
    model: &str,
    prompt: Prompt,
    schema_name: &'static str,
    stage: PipelineStage,
) -> Result<T, PipelineError>
where
    T: JsonSchema + DeserializeOwned,
{
    let schema = schemars::schema_for!(T).to_value();
    let request = StructuredRequest {
        model: model.to_string(),
        system: prompt.system,
        user: prompt.user,
        schema_name: schema_name.to_string(),
        schema,
    };

    tracing::debug!(model, schema = schema_name, stage = %stage, "requesting structured output");

    let value = client
        .complete(request)
        .await
        .map_err(|source| PipelineError::Stage { stage, source })?;

    if value.is_null() {
        return Err(PipelineError::EmptyResponse {
            stage,
            what: schema_name,
        });
    }

    serde_json::from_value(value).map_err(|source| PipelineError::Schema {
        stage,
        schema: schema_name,
        source,
    })
}
