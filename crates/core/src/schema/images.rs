//! # Image Plan
//!
//! Per-slide stock image decisions and the images that were resolved for them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an image is used on a slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Full-bleed behind the content
    Background,
    /// Placed as a content element
    Element,
    #[default]
    None,
}

/// The model's plan for one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideImagePlan {
    pub slide_index: usize,
    pub use_image: bool,
    pub image_type: ImageType,
    /// Search keywords, English
    pub keywords: String,
    /// Visual style hint, e.g. "minimal", "moody"
    pub style: String,
}

/// Output of the image keyword stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlan {
    pub slides: Vec<SlideImagePlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttribution {
    pub photographer: String,
    pub profile_url: String,
}

/// A stock photo returned by the image search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub attribution: ImageAttribution,
}

/// Final image decision for one slide, after searching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideImageData {
    pub slide_index: usize,
    pub image_type: ImageType,
    #[serde(default)]
    pub image: Option<ResolvedImage>,
}

impl SlideImageData {
    /// A slide without an image
    pub fn none(slide_index: usize) -> Self {
        Self {
            slide_index,
            image_type: ImageType::None,
            image: None,
        }
    }
}
