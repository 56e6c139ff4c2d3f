//! # Carousel Validator
//!
//! Runs the geometry and contrast checks over every slide and aggregates the
//! findings. Errors block; warnings never do.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bounds::is_within_bounds;
use super::contrast::{has_sufficient_contrast, ContrastLevel};
use super::overlap::{find_text_overlaps, DEFAULT_MIN_OVERLAP_PERCENT};
use crate::schema::{CarouselData, ElementData, PipelineConfig, Quality, SlideData};

/// Slide index used for carousel-level errors
pub const CAROUSEL_LEVEL: i32 = -1;

/// Strict mode warns when text comes closer than this to the canvas width
const STRICT_HORIZONTAL_MARGIN: f64 = 80.0;
/// Strict mode warns below this font size
const STRICT_MIN_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Overlap,
    OutOfBounds,
    LowContrast,
    MissingElement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    /// `-1` for carousel-level errors
    pub slide_index: i32,
    #[serde(default)]
    pub element_index: Option<usize>,
    pub message: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub slide_index: i32,
    #[serde(default)]
    pub element_index: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Findings for a single slide
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub min_text_elements: usize,
    pub min_overlap_percent: f64,
    /// Extra warnings for premium output
    pub strict_mode: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            canvas_width: f64::from(crate::schema::config::DEFAULT_CANVAS_WIDTH),
            canvas_height: f64::from(crate::schema::config::DEFAULT_CANVAS_HEIGHT),
            min_text_elements: 1,
            min_overlap_percent: DEFAULT_MIN_OVERLAP_PERCENT,
            strict_mode: false,
        }
    }
}

impl ValidationOptions {
    /// Options the pipeline uses for a run
    pub fn for_config(config: &PipelineConfig) -> Self {
        Self {
            canvas_width: f64::from(config.canvas.width),
            canvas_height: f64::from(config.canvas.height),
            strict_mode: config.quality == Quality::Premium,
            ..Default::default()
        }
    }
}

fn slide_number(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Validate one slide
pub fn validate_slide(slide: &SlideData, index: usize, options: &ValidationOptions) -> SlideReport {
    let slide_index = slide_number(index);
    let mut report = SlideReport::default();

    // (a) minimum text content
    let text_count = slide.text_elements().count();
    if text_count < options.min_text_elements {
        report.errors.push(ValidationError {
            kind: ValidationErrorKind::MissingElement,
            slide_index,
            element_index: None,
            message: format!(
                "Slide has {} text element(s), at least {} required",
                text_count, options.min_text_elements
            ),
            details: json!({ "found": text_count, "required": options.min_text_elements }),
        });
    }

    // (b) bounds
    for (element_index, element) in slide.elements.iter().enumerate() {
        let check = is_within_bounds(element, options.canvas_width, options.canvas_height);
        if !check.within_bounds {
            report.errors.push(ValidationError {
                kind: ValidationErrorKind::OutOfBounds,
                slide_index,
                element_index: Some(element_index),
                message: format!(
                    "{} element is outside the canvas: {}",
                    element.kind(),
                    check.violations.join("; ")
                ),
                details: json!({ "violations": check.violations }),
            });
        }

        if !options.strict_mode {
            continue;
        }
        if let ElementData::Text(text) = element {
            if text.width > options.canvas_width - STRICT_HORIZONTAL_MARGIN {
                report.warnings.push(ValidationWarning {
                    slide_index,
                    element_index: Some(element_index),
                    message: format!(
                        "Text is {}px wide, leaving less than {}px of horizontal margin",
                        text.width, STRICT_HORIZONTAL_MARGIN
                    ),
                });
            }
            if text.font_size < STRICT_MIN_FONT_SIZE {
                report.warnings.push(ValidationWarning {
                    slide_index,
                    element_index: Some(element_index),
                    message: format!(
                        "Font size {}px is below the {}px minimum",
                        text.font_size, STRICT_MIN_FONT_SIZE
                    ),
                });
            }
        }
    }

    // (c) contrast against the slide background
    for (element_index, element) in slide.elements.iter().enumerate() {
        let ElementData::Text(text) = element else {
            continue;
        };
        match has_sufficient_contrast(
            &text.color,
            &slide.background_color,
            text.font_size,
            text.font_weight,
        ) {
            Ok(check) if !check.passes => report.errors.push(ValidationError {
                kind: ValidationErrorKind::LowContrast,
                slide_index,
                element_index: Some(element_index),
                message: format!(
                    "Text color {} on {} has contrast {:.2}:1 ({})",
                    text.color,
                    slide.background_color,
                    check.ratio,
                    check.level.as_str()
                ),
                details: json!({
                    "ratio": check.ratio,
                    "level": check.level,
                    "textColor": text.color,
                    "backgroundColor": slide.background_color,
                }),
            }),
            Ok(check) if options.strict_mode && check.level == ContrastLevel::AaLarge => {
                report.warnings.push(ValidationWarning {
                    slide_index,
                    element_index: Some(element_index),
                    message: format!(
                        "Contrast {:.2}:1 only meets AA for large text",
                        check.ratio
                    ),
                })
            }
            Ok(_) => {}
            Err(e) => report.errors.push(ValidationError {
                kind: ValidationErrorKind::LowContrast,
                slide_index,
                element_index: Some(element_index),
                message: format!("Cannot check contrast: {}", e),
                details: json!({
                    "textColor": text.color,
                    "backgroundColor": slide.background_color,
                }),
            }),
        }
    }

    // (d) text collisions
    for overlap in find_text_overlaps(&slide.elements, options.min_overlap_percent) {
        report.errors.push(ValidationError {
            kind: ValidationErrorKind::Overlap,
            slide_index,
            element_index: Some(overlap.index1),
            message: format!(
                "Text elements {} and {} overlap by {:.0}%",
                overlap.index1, overlap.index2, overlap.overlap_percent
            ),
            details: json!({
                "otherElementIndex": overlap.index2,
                "overlapPercent": overlap.overlap_percent,
            }),
        });
    }

    report
}

/// Validate every slide; recomputed from scratch on each call
pub fn validate_carousel(carousel: &CarouselData, options: &ValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if carousel.slides.is_empty() {
        errors.push(ValidationError {
            kind: ValidationErrorKind::MissingElement,
            slide_index: CAROUSEL_LEVEL,
            element_index: None,
            message: "Carousel has no slides".to_string(),
            details: serde_json::Value::Null,
        });
    }

    for (index, slide) in carousel.slides.iter().enumerate() {
        let report = validate_slide(slide, index, options);
        errors.extend(report.errors);
        warnings.extend(report.warnings);
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

impl ValidationResult {
    /// Errors recorded for one slide
    pub fn errors_for_slide(&self, slide_index: usize) -> Vec<&ValidationError> {
        let wanted = slide_number(slide_index);
        self.errors
            .iter()
            .filter(|e| e.slide_index == wanted)
            .collect()
    }

    /// Sorted, distinct indices of slides with at least one error
    pub fn invalid_slide_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .errors
            .iter()
            .filter_map(|e| usize::try_from(e.slide_index).ok())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FontWeight, RectangleElement, TextAlign, TextElement};

    fn text(x: f64, y: f64, width: f64, height: f64, color: &str, size: f64) -> ElementData {
        ElementData::Text(TextElement {
            x,
            y,
            width,
            height: Some(height),
            text: "Sample text".to_string(),
            font_size: size,
            font_family: "Inter".to_string(),
            font_weight: FontWeight::Normal,
            color: color.to_string(),
            align: TextAlign::Left,
            line_height: None,
        })
    }

    fn slide(elements: Vec<ElementData>) -> SlideData {
        SlideData {
            background_color: "#ffffff".to_string(),
            elements,
            background_image: None,
        }
    }

    fn good_slide() -> SlideData {
        slide(vec![
            text(80.0, 200.0, 900.0, 200.0, "#111111", 64.0),
            text(80.0, 500.0, 900.0, 300.0, "#333333", 32.0),
        ])
    }

    #[test]
    fn test_empty_carousel_has_single_error() {
        let result = validate_carousel(&CarouselData::default(), &ValidationOptions::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::MissingElement);
        assert_eq!(result.errors[0].slide_index, CAROUSEL_LEVEL);
        assert!(result.invalid_slide_indices().is_empty());
    }

    #[test]
    fn test_good_carousel_is_valid() {
        let carousel = CarouselData {
            slides: vec![good_slide(), good_slide()],
        };
        let result = validate_carousel(&carousel, &ValidationOptions::default());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_checks_run_in_order() {
        let bad = SlideData {
            background_color: "#ffffff".to_string(),
            elements: vec![
                ElementData::Rectangle(RectangleElement {
                    x: -10.0,
                    y: 0.0,
                    width: 100.0,
                    height: 100.0,
                    fill: "#000000".to_string(),
                    corner_radius: None,
                    opacity: None,
                }),
                text(80.0, 200.0, 400.0, 200.0, "#eeeeee", 32.0),
                text(100.0, 220.0, 400.0, 200.0, "#111111", 32.0),
            ],
            background_image: None,
        };
        let options = ValidationOptions {
            min_text_elements: 3,
            ..Default::default()
        };
        let report = validate_slide(&bad, 4, &options);
        let kinds: Vec<_> = report.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::MissingElement,
                ValidationErrorKind::OutOfBounds,
                ValidationErrorKind::LowContrast,
                ValidationErrorKind::Overlap,
            ]
        );
        assert!(report.errors.iter().all(|e| e.slide_index == 4));
        assert_eq!(report.errors[3].details["otherElementIndex"], 2);
        assert!(report.errors[2].message.ends_with("(fail)"), "{}", report.errors[2].message);
    }

    #[test]
    fn test_strict_mode_only_warns() {
        let s = slide(vec![
            text(20.0, 200.0, 1040.0, 200.0, "#111111", 14.0),
            // #777777 on white: AA-large only
            text(80.0, 600.0, 900.0, 200.0, "#777777", 16.0),
        ]);
        let lenient = validate_slide(&s, 0, &ValidationOptions::default());
        assert!(lenient.errors.is_empty());
        assert!(lenient.warnings.is_empty());

        let strict = validate_slide(
            &s,
            0,
            &ValidationOptions {
                strict_mode: true,
                ..Default::default()
            },
        );
        assert!(strict.errors.is_empty());
        assert_eq!(strict.warnings.len(), 3);
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let s = slide(vec![text(80.0, 200.0, 900.0, 200.0, "not-a-color", 32.0)]);
        let report = validate_slide(&s, 0, &ValidationOptions::default());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::LowContrast);
    }

    #[test]
    fn test_invalid_slide_indices_are_sorted_and_distinct() {
        let broken = slide(vec![]);
        let carousel = CarouselData {
            slides: vec![broken.clone(), good_slide(), broken.clone(), broken],
        };
        let options = ValidationOptions {
            min_text_elements: 2,
            ..Default::default()
        };
        let result = validate_carousel(&carousel, &options);
        assert_eq!(result.invalid_slide_indices(), vec![0, 2, 3]);
        assert_eq!(result.errors_for_slide(2).len(), 1);
        assert!(result.errors_for_slide(1).is_empty());
    }
}
