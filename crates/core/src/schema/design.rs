//! # Design System
//!
//! Shared visual vocabulary applied to every slide of one carousel.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Font weight as emitted by the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    #[serde(alias = "400")]
    Normal,
    #[serde(alias = "500")]
    Medium,
    #[serde(alias = "600")]
    Semibold,
    #[serde(alias = "700")]
    Bold,
}

impl FontWeight {
    /// Semibold and heavier count as bold for the WCAG large-text rule
    pub fn is_bold(&self) -> bool {
        matches!(self, FontWeight::Semibold | FontWeight::Bold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub background_alt: String,
    pub text: String,
    pub text_muted: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Size in pixels
    pub size: f64,
    pub weight: FontWeight,
    #[serde(default)]
    pub line_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub headline: TextStyle,
    pub subheadline: TextStyle,
    pub body: TextStyle,
    pub caption: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub slide_padding: f64,
    pub element_gap: f64,
    pub section_gap: f64,
    pub text_padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStyle {
    Geometric,
    Organic,
    Minimal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecorativeStyle {
    pub use_shapes: bool,
    pub shape_style: ShapeStyle,
    pub corner_radius: f64,
    /// 0.0 - 1.0
    pub opacity: f64,
}

/// Output of the design stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystem {
    pub colors: ColorPalette,
    pub typography: Typography,
    pub spacing: Spacing,
    pub decorative: DecorativeStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_numeric_aliases() {
        let weights: Vec<FontWeight> =
            serde_json::from_str(r#"["400", "600", "bold", "medium"]"#).unwrap();
        assert_eq!(
            weights,
            vec![
                FontWeight::Normal,
                FontWeight::Semibold,
                FontWeight::Bold,
                FontWeight::Medium
            ]
        );
        assert!(FontWeight::Semibold.is_bold());
        assert!(!FontWeight::Medium.is_bold());
    }
}
