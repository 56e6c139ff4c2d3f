//! # Bounds - Canvas Containment
//!
//! Reports every rule an element breaks, so refinement prompts can be specific.

use serde::{Deserialize, Serialize};

use super::geometry::element_box;
use crate::schema::ElementData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsCheck {
    pub within_bounds: bool,
    pub violations: Vec<String>,
}

/// Check that an element sits entirely inside `[0, 0, canvas_width, canvas_height]`
pub fn is_within_bounds(element: &ElementData, canvas_width: f64, canvas_height: f64) -> BoundsCheck {
    let mut violations = Vec::new();
    let bbox = element_box(element);

    match element {
        ElementData::Circle(circle) => {
            if circle.radius < 0.0 {
                violations.push(format!("radius ({}) must not be negative", circle.radius));
            }
        }
        ElementData::Text(_) | ElementData::Rectangle(_) => {
            if bbox.width < 0.0 {
                violations.push(format!("width ({}) must not be negative", bbox.width));
            }
            if bbox.height < 0.0 {
                violations.push(format!("height ({}) must not be negative", bbox.height));
            }
        }
    }

    if bbox.left < 0.0 {
        violations.push(format!("left edge ({}) is left of the canvas", bbox.left));
    }
    if bbox.top < 0.0 {
        violations.push(format!("top edge ({}) is above the canvas", bbox.top));
    }
    if bbox.right() > canvas_width {
        violations.push(format!(
            "right edge ({}) exceeds canvas width ({})",
            bbox.right(),
            canvas_width
        ));
    }
    if bbox.bottom() > canvas_height {
        violations.push(format!(
            "bottom edge ({}) exceeds canvas height ({})",
            bbox.bottom(),
            canvas_height
        ));
    }

    BoundsCheck {
        within_bounds: violations.is_empty(),
        violations,
    }
}
