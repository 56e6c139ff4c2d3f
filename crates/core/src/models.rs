//! # Model Configuration
//!
//! Which model serves which stage, and where the OpenAI-compatible endpoint
//! lives.
//!
//! Model choice is a cost lever only: premium content outlines go to the
//! stronger model, every other (quality, stage) pair uses the lighter one.

use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineStage;
use crate::schema::Quality;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STRONG_MODEL: &str = "gpt-4o";
pub const DEFAULT_LIGHT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for model access
///
/// ## Example
/// ```rust,ignore
/// use carousel_core::models::ModelConfig;
///
/// let config = ModelConfig::from_env()?;
/// let model = config.model_for(Quality::Premium, PipelineStage::Content);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Used for premium content outlines
    pub strong_model: String,
    /// Used everywhere else
    pub light_model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            strong_model: DEFAULT_STRONG_MODEL.to_string(),
            light_model: DEFAULT_LIGHT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read `OPENAI_API_KEY` (required) plus optional overrides
    /// `OPENAI_BASE_URL`, `CAROUSEL_STRONG_MODEL`, `CAROUSEL_LIGHT_MODEL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("CAROUSEL_STRONG_MODEL") {
            config.strong_model = model;
        }
        if let Ok(model) = std::env::var("CAROUSEL_LIGHT_MODEL") {
            config.light_model = model;
        }
        Ok(config)
    }

    /// Set base URL (for OpenAI-compatible endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_models(mut self, strong: impl Into<String>, light: impl Into<String>) -> Self {
        self.strong_model = strong.into();
        self.light_model = light.into();
        self
    }

    /// Model serving `stage` at `quality`
    pub fn model_for(&self, quality: Quality, stage: PipelineStage) -> &str {
        match (quality, stage) {
            (Quality::Premium, PipelineStage::Content) => &self.strong_model,
            _ => &self.light_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_premium_content_uses_strong_model() {
        let config = ModelConfig::default();
        let stages = [
            PipelineStage::Generate,
            PipelineStage::Content,
            PipelineStage::Design,
            PipelineStage::Images,
            PipelineStage::Layout,
            PipelineStage::Refinement,
        ];
        for quality in [Quality::Basic, Quality::Standard, Quality::Premium] {
            for stage in stages {
                let expected = if quality == Quality::Premium && stage == PipelineStage::Content {
                    DEFAULT_STRONG_MODEL
                } else {
                    DEFAULT_LIGHT_MODEL
                };
                assert_eq!(config.model_for(quality, stage), expected);
            }
        }
    }
}
