//! # Prompt Builders
//!
//! Pure functions producing the system and user prompt for every stage.
//! System prompts are bundled at compile time from `defaults/`.

use serde::Serialize;

use crate::schema::{
    ContentOutline, DesignSystem, ImageType, PipelineConfig, SlideContent, SlideData,
    SlideImageData,
};
use crate::validation::{suggest_text_color, ValidationError};

/// Basic tier - whole carousel in one call
pub const BASIC: &str = include_str!("defaults/basic.md");

/// Content outline
pub const CONTENT: &str = include_str!("defaults/content.md");

/// Design system
pub const DESIGN: &str = include_str!("defaults/design.md");

/// Image keyword planning
pub const IMAGES: &str = include_str!("defaults/images.md");

/// Single slide layout
pub const LAYOUT: &str = include_str!("defaults/layout.md");

/// Targeted slide repair
pub const REFINEMENT: &str = include_str!("defaults/refinement.md");

/// All system prompts with their slugs
pub fn all_system_prompts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("basic", BASIC),
        ("content", CONTENT),
        ("design", DESIGN),
        ("images", IMAGES),
        ("layout", LAYOUT),
        ("refinement", REFINEMENT),
    ]
}

/// A system + user prompt pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    fn new(system: &str, user: String) -> Self {
        Self {
            system: system.to_string(),
            user,
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn canvas_line(config: &PipelineConfig) -> String {
    format!(
        "Canvas: {}x{} pixels (width x height). Origin is the top-left corner.",
        config.canvas.width, config.canvas.height
    )
}

fn language_line(config: &PipelineConfig) -> String {
    format!(
        "Write all slide text in {} ({}).",
        config.language.display_name(),
        config.language.as_str()
    )
}

fn brand_section(config: &PipelineConfig) -> String {
    let lines = config
        .brand_kit
        .as_ref()
        .map(|kit| kit.constraint_lines())
        .unwrap_or_default();
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n\nBrand constraints (must be used):\n{}", lines.join("\n"))
    }
}

/// Basic tier: the whole carousel from one prompt
pub fn basic_carousel(config: &PipelineConfig) -> Prompt {
    let user = format!(
        "Create a carousel about: {topic}\n\nStyle: {style}\nNumber of slides: {count}\n{language}\n{canvas}{brand}",
        topic = config.topic,
        style = config.style.as_str(),
        count = config.slide_count,
        language = language_line(config),
        canvas = canvas_line(config),
        brand = brand_section(config),
    );
    Prompt::new(BASIC, user)
}

/// Stage 1: text-only outline
pub fn content_outline(config: &PipelineConfig) -> Prompt {
    let user = format!(
        "Topic: {topic}\nStyle: {style}\nNumber of slides: {count}\n{language}\n\nStart with a hook slide and end with a call-to-action slide.",
        topic = config.topic,
        style = config.style.as_str(),
        count = config.slide_count,
        language = language_line(config),
    );
    Prompt::new(CONTENT, user)
}

/// Stage 2: design system, independent of the outline
pub fn design_system(config: &PipelineConfig) -> Prompt {
    let user = format!(
        "Topic: {topic}\nStyle: {style}\n{canvas}{brand}",
        topic = config.topic,
        style = config.style.as_str(),
        canvas = canvas_line(config),
        brand = brand_section(config),
    );
    Prompt::new(DESIGN, user)
}

/// Optional stage: which slides get stock images
pub fn image_keywords(config: &PipelineConfig, outline: &ContentOutline) -> Prompt {
    let slides: Vec<String> = outline
        .slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            format!(
                "{}. [{:?}] {}",
                i,
                slide.slide_type,
                slide.headline
            )
        })
        .collect();
    let user = format!(
        "Carousel: {title}\nTopic: {topic}\nStyle: {style}\n\nSlides (index, type, headline):\n{slides}",
        title = outline.title,
        topic = config.topic,
        style = config.style.as_str(),
        slides = slides.join("\n"),
    );
    Prompt::new(IMAGES, user)
}

/// Stage 3: one slide's layout
pub fn slide_layout(
    config: &PipelineConfig,
    design: &DesignSystem,
    content: &SlideContent,
    index: usize,
    total: usize,
    image: Option<&SlideImageData>,
) -> Prompt {
    let image_section = match image {
        Some(data) if data.image.is_some() => match data.image_type {
            ImageType::Background => {
                "\n\nThis slide has a full-bleed background photo with a dark overlay.".to_string()
            }
            ImageType::Element => {
                "\n\nThis slide has a photo element. Reserve roughly a third of the canvas for it and keep text clear of that area.".to_string()
            }
            ImageType::None => String::new(),
        },
        _ => String::new(),
    };

    let user = format!(
        "Slide {position} of {total}.\n{canvas}\n\nDesign system:\n{design}\n\nSlide content ({blocks} text blocks, each needs its own text element):\n{content}{image}",
        position = index + 1,
        total = total,
        blocks = content.text_block_count(),
        canvas = canvas_line(config),
        design = pretty(design),
        content = pretty(content),
        image = image_section,
    );
    Prompt::new(LAYOUT, user)
}

/// Refinement: repair one slide given its errors
pub fn slide_refinement(
    config: &PipelineConfig,
    design: &DesignSystem,
    content: &SlideContent,
    current: &SlideData,
    errors: &[&ValidationError],
) -> Prompt {
    let error_lines: Vec<String> = errors
        .iter()
        .map(|e| match e.element_index {
            Some(element) => format!("- [{:?}] element {}: {}", e.kind, element, e.message),
            None => format!("- [{:?}] {}", e.kind, e.message),
        })
        .collect();

    let hint = suggest_text_color(&current.background_color)
        .map(|color| {
            format!(
                "\n\nOn background {} the most readable text color is {}.",
                current.background_color, color
            )
        })
        .unwrap_or_default();

    let user = format!(
        "{canvas}\n\nErrors to fix:\n{errors}{hint}\n\nCurrent slide:\n{slide}\n\nSlide content:\n{content}\n\nDesign system:\n{design}",
        canvas = canvas_line(config),
        errors = error_lines.join("\n"),
        hint = hint,
        slide = pretty(current),
        content = pretty(content),
        design = pretty(design),
    );
    Prompt::new(REFINEMENT, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BrandKit, Language, SlideType};
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_all_prompts_non_empty() {
        for (slug, content) in all_system_prompts() {
            assert!(content.len() > 50, "Prompt '{}' seems too short", slug);
        }
        assert_eq!(all_system_prompts().len(), 6);
    }

    #[test]
    fn test_content_prompt_carries_config() {
        let config = PipelineConfig::new("5 tips for remote work")
            .with_slide_count(7)
            .with_language(Language::De);
        let prompt = content_outline(&config);
        assert_eq!(prompt.system, CONTENT);
        assert!(prompt.user.contains("5 tips for remote work"));
        assert!(prompt.user.contains("Number of slides: 7"));
        assert!(prompt.user.contains("German"));
    }

    #[test]
    fn test_brand_kit_only_when_present() {
        let plain = PipelineConfig::new("x");
        assert!(!design_system(&plain).user.contains("Brand constraints"));

        let branded = plain.with_brand_kit(BrandKit {
            heading_font: Some("Playfair Display".to_string()),
            ..Default::default()
        });
        let prompt = design_system(&branded);
        assert!(prompt.user.contains("Brand constraints"));
        assert!(prompt.user.contains("Playfair Display"));
    }

    fn design() -> DesignSystem {
        serde_json::from_value(serde_json::json!({
            "colors": {"primary": "#111111", "secondary": "#222222", "background": "#ffffff",
                       "backgroundAlt": "#f4f4f4", "text": "#111111", "textMuted": "#555555", "accent": "#ff0066"},
            "typography": {"fontFamily": "Inter",
                "headline": {"size": 72, "weight": "bold"},
                "subheadline": {"size": 40, "weight": "semibold"},
                "body": {"size": 32, "weight": "normal"},
                "caption": {"size": 22, "weight": "normal"}},
            "spacing": {"slidePadding": 80, "elementGap": 32, "sectionGap": 64, "textPadding": 16},
            "decorative": {"useShapes": true, "shapeStyle": "geometric", "cornerRadius": 24, "opacity": 0.2}
        }))
        .unwrap()
    }

    #[test]
    fn test_layout_prompt_counts_text_blocks() {
        let config = PipelineConfig::new("x");
        let content = SlideContent {
            slide_type: SlideType::List,
            headline: "Three habits".to_string(),
            subheadline: None,
            body: Some("Small changes compound.".to_string()),
            bullets: Some(vec!["Walk".to_string(), "Read".to_string()]),
            quote: None,
            attribution: None,
            cta: None,
        };
        let prompt = slide_layout(&config, &design(), &content, 1, 5, None);
        assert_eq!(prompt.system, LAYOUT);
        assert!(prompt.user.starts_with("Slide 2 of 5."));
        assert!(prompt.user.contains("(4 text blocks"));
        assert!(!prompt.user.contains("background photo"));
    }

    #[test]
    fn test_refinement_lists_errors() {
        let config = PipelineConfig::new("x");
        let content = SlideContent {
            slide_type: SlideType::Hook,
            headline: "Hello".to_string(),
            subheadline: None,
            body: None,
            bullets: None,
            quote: None,
            attribution: None,
            cta: None,
        };
        let slide = SlideData {
            background_color: "#000000".to_string(),
            elements: vec![],
            background_image: None,
        };
        let error = ValidationError {
            kind: ValidationErrorKind::MissingElement,
            slide_index: 0,
            element_index: None,
            message: "Slide has 0 text element(s)".to_string(),
            details: serde_json::Value::Null,
        };
        let design = design();

        let prompt = slide_refinement(&config, &design, &content, &slide, &[&error]);
        assert_eq!(prompt.system, REFINEMENT);
        assert!(prompt.user.contains("[MissingElement] Slide has 0 text element(s)"));
        assert!(prompt.user.contains("most readable text color is #ffffff"));
    }
}
