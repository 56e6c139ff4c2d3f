//! # Layout Validation
//!
//! Deterministic checks over generated slides. Nothing here calls a model.
//!
//! ## Modules
//!
//! - `geometry` - Element boxes and the text height estimate
//! - `bounds` - Canvas containment
//! - `overlap` - Text/text collisions
//! - `contrast` - WCAG 2.1 contrast ratio and levels
//! - `carousel` - Per-slide and whole-carousel aggregation

pub mod bounds;
pub mod carousel;
pub mod contrast;
pub mod geometry;
pub mod overlap;

pub use bounds::{is_within_bounds, BoundsCheck};
pub use carousel::{
    validate_carousel, validate_slide, SlideReport, ValidationError, ValidationErrorKind,
    ValidationOptions, ValidationResult, ValidationWarning, CAROUSEL_LEVEL,
};
pub use contrast::{
    contrast_ratio, has_sufficient_contrast, luminance, suggest_text_color, ColorError,
    ContrastCheck, ContrastLevel,
};
pub use overlap::{find_text_overlaps, TextOverlap, DEFAULT_MIN_OVERLAP_PERCENT};
