//! # Content Outline
//!
//! Text-only skeleton of a carousel, produced by the content stage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Role a slide plays in the narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    /// Attention-grabbing opener
    Hook,
    Content,
    List,
    Quote,
    /// Call to action, closes the deck
    Cta,
}

/// Copy for a single slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub headline: String,
    #[serde(default)]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Only for `list` slides
    #[serde(default)]
    pub bullets: Option<Vec<String>>,
    /// Only for `quote` slides
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    /// Only for `cta` slides
    #[serde(default)]
    pub cta: Option<String>,
}

/// Output of the content stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentOutline {
    pub title: String,
    pub slides: Vec<SlideContent>,
}

impl SlideContent {
    /// Number of text blocks a layout for this slide has to place
    pub fn text_block_count(&self) -> usize {
        let optional = [
            self.subheadline.is_some(),
            self.body.is_some(),
            self.quote.is_some(),
            self.attribution.is_some(),
            self.cta.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        1 + optional + self.bullets.as_ref().map_or(0, Vec::len)
    }
}
