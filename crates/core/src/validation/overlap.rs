//! # Overlap - Text Collision Detection
//!
//! Only text elements are compared. Decorative shapes may sit behind or
//! around text and are never reported.

use serde::{Deserialize, Serialize};

use super::geometry::element_box;
use crate::schema::ElementData;

pub const DEFAULT_MIN_OVERLAP_PERCENT: f64 = 10.0;

/// Two text elements whose boxes overlap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlap {
    /// Position in the slide's element list, always `< index2`
    pub index1: usize,
    pub index2: usize,
    /// Intersection as a percentage of the smaller box
    pub overlap_percent: f64,
}

/// Intersection area as a percentage of the smaller box's area
pub fn overlap_percent(a: &ElementData, b: &ElementData) -> f64 {
    let box_a = element_box(a);
    let box_b = element_box(b);
    let smaller = box_a.area().min(box_b.area());
    if smaller <= 0.0 {
        return 0.0;
    }
    box_a.intersection_area(&box_b) * 100.0 / smaller
}

/// Every pair of text elements overlapping by at least `min_overlap_percent`
pub fn find_text_overlaps(elements: &[ElementData], min_overlap_percent: f64) -> Vec<TextOverlap> {
    let texts: Vec<(usize, &ElementData)> = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| matches!(element, ElementData::Text(_)))
        .collect();

    let mut overlaps = Vec::new();
    for (i, (index1, first)) in texts.iter().enumerate() {
        for (index2, second) in &texts[i + 1..] {
            let percent = overlap_percent(first, second);
            if percent > 0.0 && percent >= min_overlap_percent {
                overlaps.push(TextOverlap {
                    index1: *index1,
                    index2: *index2,
                    overlap_percent: percent,
                });
            }
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FontWeight, RectangleElement, TextAlign, TextElement};

    fn text(x: f64, y: f64, width: f64, height: f64) -> ElementData {
        ElementData::Text(TextElement {
            x,
            y,
            width,
            height: Some(height),
            text: "Sample".to_string(),
            font_size: 32.0,
            font_family: "Inter".to_string(),
            font_weight: FontWeight::Normal,
            color: "#111111".to_string(),
            align: TextAlign::Left,
            line_height: None,
        })
    }

    fn rect(x: f64, y: f64, width: f64, height: f64) -> ElementData {
        ElementData::Rectangle(RectangleElement {
            x,
            y,
            width,
            height,
            fill: "#eeeeee".to_string(),
            corner_radius: None,
            opacity: None,
        })
    }

    #[test]
    fn test_large_box_covering_small_one_is_full_overlap() {
        let elements = vec![text(0.0, 0.0, 1000.0, 1000.0), text(100.0, 100.0, 50.0, 50.0)];
        let overlaps = find_text_overlaps(&elements, DEFAULT_MIN_OVERLAP_PERCENT);
        assert_eq!(overlaps.len(), 1);
        assert!((overlaps[0].overlap_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shapes_are_ignored() {
        let elements = vec![rect(0.0, 0.0, 500.0, 500.0), text(10.0, 10.0, 100.0, 100.0), rect(0.0, 0.0, 200.0, 200.0)];
        assert!(find_text_overlaps(&elements, DEFAULT_MIN_OVERLAP_PERCENT).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 100x100 boxes offset by 90px horizontally → 10x100 = 10%
        let elements = vec![text(0.0, 0.0, 100.0, 100.0), text(90.0, 0.0, 100.0, 100.0)];
        assert_eq!(find_text_overlaps(&elements, 10.0).len(), 1);

        // 91px offset → 9%
        let elements = vec![text(0.0, 0.0, 100.0, 100.0), text(91.0, 0.0, 100.0, 100.0)];
        assert!(find_text_overlaps(&elements, 10.0).is_empty());
    }

    #[test]
    fn test_order_only_changes_indices() {
        let forward = vec![
            text(0.0, 0.0, 100.0, 100.0),
            rect(0.0, 0.0, 50.0, 50.0),
            text(50.0, 50.0, 100.0, 100.0),
            text(600.0, 600.0, 100.0, 100.0),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let a = find_text_overlaps(&forward, 10.0);
        let b = find_text_overlaps(&reversed, 10.0);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!((a[0].index1, a[0].index2), (0, 2));
        assert_eq!((b[0].index1, b[0].index2), (1, 3));
        assert_eq!(a[0].overlap_percent, b[0].overlap_percent);
    }

    #[test]
    fn test_missing_height_is_estimated() {
        let mut upper = text(0.0, 0.0, 400.0, 0.0);
        if let ElementData::Text(t) = &mut upper {
            t.height = None;
            // 32px font, 16px per char, 25 chars per line → 3 lines of ~38px
            t.text = "x".repeat(60);
        }
        let lower = text(0.0, 80.0, 400.0, 100.0);
        let overlaps = find_text_overlaps(&[upper, lower], 10.0);
        assert_eq!(overlaps.len(), 1);
    }
}
