//! # Slide Layout
//!
//! Positioned elements per slide. This is the artifact handed back to callers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::design::FontWeight;
use super::images::ResolvedImage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Estimated from the text when absent
    #[serde(default)]
    pub height: Option<f64>,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub color: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub line_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RectangleElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// `x`/`y` is the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircleElement {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill: String,
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// A positioned element on a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementData {
    Text(TextElement),
    Rectangle(RectangleElement),
    Circle(CircleElement),
}

impl ElementData {
    pub fn kind(&self) -> &'static str {
        match self {
            ElementData::Text(_) => "text",
            ElementData::Rectangle(_) => "rectangle",
            ElementData::Circle(_) => "circle",
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            ElementData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One generated slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideData {
    pub background_color: String,
    pub elements: Vec<ElementData>,
    /// Set by the pipeline from the image stage, never by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub background_image: Option<ResolvedImage>,
}

impl SlideData {
    pub fn text_elements(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(ElementData::as_text)
    }
}

/// The final artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarouselData {
    pub slides: Vec<SlideData>,
}
