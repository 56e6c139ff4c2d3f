//! # Image Search
//!
//! Keyword → stock photo lookup. "No results" is an empty list, only
//! transport failures are errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::schema::{CanvasSize, ResolvedImage};

/// Results requested per slide; the first one is used
pub const DEFAULT_RESULT_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn for_canvas(canvas: CanvasSize) -> Self {
        match canvas.width.cmp(&canvas.height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Squarish,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSearchOptions {
    pub count: u32,
    pub orientation: Orientation,
}

impl ImageSearchOptions {
    pub fn for_canvas(canvas: CanvasSize) -> Self {
        Self {
            count: DEFAULT_RESULT_COUNT,
            orientation: Orientation::for_canvas(canvas),
        }
    }
}

/// Stock photo search, safe to share across runs
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(
        &self,
        keywords: &str,
        options: &ImageSearchOptions,
    ) -> anyhow::Result<Vec<ResolvedImage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_follows_canvas() {
        let portrait = CanvasSize { width: 1080, height: 1350 };
        let square = CanvasSize { width: 1080, height: 1080 };
        let wide = CanvasSize { width: 1920, height: 1080 };
        assert_eq!(Orientation::for_canvas(portrait), Orientation::Portrait);
        assert_eq!(Orientation::for_canvas(square), Orientation::Squarish);
        assert_eq!(Orientation::for_canvas(wide), Orientation::Landscape);
        assert_eq!(ImageSearchOptions::for_canvas(portrait).count, 3);
    }
}
