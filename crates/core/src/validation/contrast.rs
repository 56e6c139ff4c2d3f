//! # Contrast - WCAG 2.1 Text Legibility
//!
//! Relative luminance, contrast ratio and conformance levels for text drawn
//! over a solid background.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::FontWeight;

/// Text at or above this size is "large" regardless of weight (18pt)
pub const LARGE_TEXT_SIZE: f64 = 24.0;
/// Bold text at or above this size is "large" (14pt bold)
pub const LARGE_BOLD_TEXT_SIZE: f64 = 18.67;

/// Luminance at which black and white text have equal contrast
const BLACK_WHITE_CROSSOVER: f64 = 0.179;

const DARK_TEXT: &str = "#1a1a1a";
const LIGHT_TEXT: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
}

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || ColorError::InvalidHex(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// WCAG relative luminance in `[0, 1]`
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a hex color
pub fn luminance(hex: &str) -> Result<f64, ColorError> {
    Ok(Rgb::from_hex(hex)?.relative_luminance())
}

/// Contrast ratio in `[1, 21]`; symmetric in its arguments
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64, ColorError> {
    let la = luminance(a)?;
    let lb = luminance(b)?;
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    Ok((lighter + 0.05) / (darker + 0.05))
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContrastLevel {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    /// Fails for this text but would pass if it were large
    #[serde(rename = "AA-large")]
    AaLarge,
    #[serde(rename = "fail")]
    Fail,
}

impl ContrastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContrastLevel::Aaa => "AAA",
            ContrastLevel::Aa => "AA",
            ContrastLevel::AaLarge => "AA-large",
            ContrastLevel::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastCheck {
    pub passes: bool,
    pub ratio: f64,
    pub level: ContrastLevel,
}

/// WCAG large-text carve-out
pub fn is_large_text(font_size: f64, weight: FontWeight) -> bool {
    font_size >= LARGE_TEXT_SIZE || (weight.is_bold() && font_size >= LARGE_BOLD_TEXT_SIZE)
}

/// Classify a ratio for text of the given size and weight
pub fn contrast_level(ratio: f64, large_text: bool) -> ContrastLevel {
    if large_text {
        if ratio >= 4.5 {
            ContrastLevel::Aaa
        } else if ratio >= 3.0 {
            ContrastLevel::Aa
        } else {
            ContrastLevel::Fail
        }
    } else if ratio >= 7.0 {
        ContrastLevel::Aaa
    } else if ratio >= 4.5 {
        ContrastLevel::Aa
    } else if ratio >= 3.0 {
        ContrastLevel::AaLarge
    } else {
        ContrastLevel::Fail
    }
}

pub fn has_sufficient_contrast(
    text_color: &str,
    background_color: &str,
    font_size: f64,
    font_weight: FontWeight,
) -> Result<ContrastCheck, ColorError> {
    let ratio = contrast_ratio(text_color, background_color)?;
    let level = contrast_level(ratio, is_large_text(font_size, font_weight));
    Ok(ContrastCheck {
        passes: level != ContrastLevel::Fail,
        ratio,
        level,
    })
}

/// Near-black or white, whichever reads better on `background`
pub fn suggest_text_color(background: &str) -> Result<&'static str, ColorError> {
    if luminance(background)? > BLACK_WHITE_CROSSOVER {
        Ok(DARK_TEXT)
    } else {
        Ok(LIGHT_TEXT)
    }
}
