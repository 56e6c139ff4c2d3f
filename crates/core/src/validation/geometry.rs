//! # Geometry
//!
//! Axis-aligned boxes for slide elements.
//!
//! Text height is an approximation: real font metrics are not available at
//! validation time, so the average glyph is taken to be half the font size
//! wide. A real text-measurement backend would produce different boxes.

use crate::schema::{ElementData, TextElement};

/// Average character width as a fraction of the font size
pub const AVG_CHAR_WIDTH_RATIO: f64 = 0.5;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Area shared with `other`, zero when disjoint
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let overlap_w = self.right().min(other.right()) - self.left.max(other.left);
        let overlap_h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if overlap_w <= 0.0 || overlap_h <= 0.0 {
            0.0
        } else {
            overlap_w * overlap_h
        }
    }
}

/// Estimated rendered height of a text block wrapped to its box width
pub fn estimate_text_height(text: &str, width: f64, font_size: f64, line_height: f64) -> f64 {
    let char_width = font_size * AVG_CHAR_WIDTH_RATIO;
    let chars_per_line = if char_width > 0.0 {
        (width / char_width).floor().max(1.0)
    } else {
        1.0
    };
    let char_count = text.chars().count().max(1) as f64;
    let lines = (char_count / chars_per_line).ceil();
    lines * font_size * line_height
}

/// Explicit height when present, otherwise the estimate
pub fn text_height(text: &TextElement) -> f64 {
    text.height.unwrap_or_else(|| {
        estimate_text_height(
            &text.text,
            text.width,
            text.font_size,
            text.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
        )
    })
}

pub fn element_box(element: &ElementData) -> BoundingBox {
    match element {
        ElementData::Text(text) => BoundingBox {
            left: text.x,
            top: text.y,
            width: text.width,
            height: text_height(text),
        },
        ElementData::Rectangle(rect) => BoundingBox {
            left: rect.x,
            top: rect.y,
            width: rect.width,
            height: rect.height,
        },
        ElementData::Circle(circle) => BoundingBox {
            left: circle.x - circle.radius,
            top: circle.y - circle.radius,
            width: circle.radius * 2.0,
            height: circle.radius * 2.0,
        },
    }
}
