//! OpenAI-compatible chat completions with strict `json_schema` output.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::model::{ModelClient, StructuredRequest};
use super::strict_schema::to_strict_schema;
use crate::models::ModelConfig;

const TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn build_body(request: StructuredRequest) -> ChatRequest {
    ChatRequest {
        model: request.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: request.system,
            },
            ChatMessage {
                role: "user",
                content: request.user,
            },
        ],
        response_format: ResponseFormat {
            format_type: "json_schema",
            json_schema: JsonSchemaFormat {
                name: request.schema_name,
                strict: true,
                schema: to_strict_schema(request.schema),
            },
        },
        temperature: TEMPERATURE,
    }
}

/// Pull the JSON document out of the first choice
fn extract_json(response: ChatResponse) -> Result<serde_json::Value> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| anyhow!("Chat completion returned no choices"))?;

    if let Some(refusal) = message.refusal {
        return Err(anyhow!("Model refused the request: {}", refusal));
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).context("Model returned invalid JSON")
        }
        _ => Err(anyhow!("Model returned empty content")),
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, request: StructuredRequest) -> Result<serde_json::Value> {
        let body = build_body(request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Chat completion failed with status {}: {}",
                status,
                error_text
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        extract_json(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_uses_strict_json_schema() {
        let body = build_body(StructuredRequest {
            model: "gpt-4o-mini".to_string(),
            system: "be terse".to_string(),
            user: "topic".to_string(),
            schema_name: "slide".to_string(),
            schema: serde_json::json!({"type": "object", "properties": {"a": {"type": "string"}}}),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "topic");
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            json["response_format"]["json_schema"]["schema"]["additionalProperties"],
            false
        );
    }

    #[test]
    fn test_extracts_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": "{\"title\":\"x\"}"}}]
        }))
        .unwrap();
        assert_eq!(extract_json(response).unwrap()["title"], "x");
    }

    #[test]
    fn test_refusal_and_empty_are_errors() {
        let refused: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": null, "refusal": "no"}}]
        }))
        .unwrap();
        assert!(extract_json(refused).is_err());

        let empty: ChatResponse = serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(extract_json(empty).is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ModelConfig::new("key").with_base_url("http://localhost:8080/v1/");
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8080/v1/chat/completions");
    }
}
