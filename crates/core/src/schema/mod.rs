//! # Carousel Schema
//!
//! Typed contracts for every artifact that crosses the model boundary, plus
//! the run configuration.
//!
//! ```text
//! PipelineConfig → ContentOutline → DesignSystem → ImagePlan → SlideData* → CarouselData
//! ```

pub mod config;
pub mod design;
pub mod images;
pub mod outline;
pub mod slide;

pub use config::{
    credits_for_quality, BrandKit, CanvasSize, Language, PipelineConfig, Quality, Style,
    MAX_SLIDES,
};
pub use design::{
    ColorPalette, DecorativeStyle, DesignSystem, FontWeight, ShapeStyle, Spacing, TextStyle,
    Typography,
};
pub use images::{
    ImageAttribution, ImagePlan, ImageType, ResolvedImage, SlideImageData, SlideImagePlan,
};
pub use outline::{ContentOutline, SlideContent, SlideType};
pub use slide::{
    CarouselData, CircleElement, ElementData, RectangleElement, SlideData, TextAlign,
    TextElement,
};
