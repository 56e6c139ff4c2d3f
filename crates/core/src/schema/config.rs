//! # Run Configuration
//!
//! Immutable parameters for a single generation run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// Maximum number of slides a carousel may contain
pub const MAX_SLIDES: usize = 10;

/// Default canvas (Instagram portrait)
pub const DEFAULT_CANVAS_WIDTH: u32 = 1080;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1350;

/// Tone of voice for the generated copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Professional,
    Casual,
    Educational,
    Inspirational,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Professional => "professional",
            Style::Casual => "casual",
            Style::Educational => "educational",
            Style::Inspirational => "inspirational",
        }
    }
}

/// Output language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    /// Human-readable name used inside prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::De => "German",
            Language::En => "English",
        }
    }
}

/// Generation strategy, trading cost for the number of stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Single call, no validation
    Basic,
    /// Multi-stage, validation is reported but not repaired
    #[default]
    Standard,
    /// Multi-stage with strict validation and automated refinement
    Premium,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Basic => "basic",
            Quality::Standard => "standard",
            Quality::Premium => "premium",
        }
    }

    /// Credits charged for one run at this tier
    pub fn credits(&self) -> u32 {
        match self {
            Quality::Basic => 1,
            Quality::Standard => 2,
            Quality::Premium => 4,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credits the billing layer must reserve before authorizing a run.
pub fn credits_for_quality(quality: Quality) -> u32 {
    quality.credits()
}

/// Brand constraints applied on top of the generated design system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKit {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub heading_font: Option<String>,
    #[serde(default)]
    pub body_font: Option<String>,
}

impl BrandKit {
    /// Lines describing every constraint that is set, for prompt injection
    pub fn constraint_lines(&self) -> Vec<String> {
        let fields = [
            ("Primary color", &self.primary_color),
            ("Secondary color", &self.secondary_color),
            ("Accent color", &self.accent_color),
            ("Background color", &self.background_color),
            ("Text color", &self.text_color),
            ("Heading font", &self.heading_font),
            ("Body font", &self.body_font),
        ];
        fields
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("- {}: {}", label, v)))
            .collect()
    }
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// Parameters for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub topic: String,
    #[serde(default)]
    pub style: Style,
    pub slide_count: usize,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub brand_kit: Option<BrandKit>,
    #[serde(default)]
    pub canvas: CanvasSize,
    #[serde(default)]
    pub use_images: bool,
}

impl PipelineConfig {
    /// Create a config with defaults for everything but the topic
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            style: Style::default(),
            slide_count: 5,
            language: Language::default(),
            quality: Quality::default(),
            brand_kit: None,
            canvas: CanvasSize::default(),
            use_images: false,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_slide_count(mut self, slide_count: usize) -> Self {
        self.slide_count = slide_count;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_images(mut self, use_images: bool) -> Self {
        self.use_images = use_images;
        self
    }

    pub fn with_brand_kit(mut self, brand_kit: BrandKit) -> Self {
        self.brand_kit = Some(brand_kit);
        self
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = CanvasSize { width, height };
        self
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.topic.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "topic must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_SLIDES).contains(&self.slide_count) {
            return Err(PipelineError::InvalidConfig(format!(
                "slide count must be between 1 and {}, got {}",
                MAX_SLIDES, self.slide_count
            )));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    /// Whether the image stage should run for this config
    pub fn wants_images(&self) -> bool {
        self.use_images && self.quality != Quality::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_per_quality() {
        assert_eq!(credits_for_quality(Quality::Basic), 1);
        assert_eq!(credits_for_quality(Quality::Standard), 2);
        assert_eq!(credits_for_quality(Quality::Premium), 4);
    }

    #[test]
    fn test_config_validation() {
        assert!(PipelineConfig::new("5 tips").validate().is_ok());
        assert!(PipelineConfig::new("   ").validate().is_err());
        assert!(PipelineConfig::new("x").with_slide_count(0).validate().is_err());
        assert!(PipelineConfig::new("x").with_slide_count(11).validate().is_err());
        assert!(PipelineConfig::new("x").with_canvas(0, 100).validate().is_err());
    }

    #[test]
    fn test_basic_never_wants_images() {
        let config = PipelineConfig::new("x")
            .with_quality(Quality::Basic)
            .with_images(true);
        assert!(!config.wants_images());
        assert!(config.with_quality(Quality::Standard).wants_images());
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"topic":"5 tips","style":"professional","slideCount":3,"language":"en","quality":"basic"}"#,
        )
        .unwrap();
        assert_eq!(config.slide_count, 3);
        assert_eq!(config.quality, Quality::Basic);
        assert_eq!(config.canvas, CanvasSize::default());
        assert!(!config.use_images);
    }

    #[test]
    fn test_brand_kit_lines_skip_unset() {
        let kit = BrandKit {
            primary_color: Some("#ff0066".to_string()),
            body_font: Some("Inter".to_string()),
            ..Default::default()
        };
        let lines = kit.constraint_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("#ff0066"));
    }
}
