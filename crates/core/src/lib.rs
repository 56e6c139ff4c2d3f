//! # Carousel Core
//!
//! The engine behind carousel generation - turns a topic into a laid-out,
//! validated set of slides by chaining structured-output model calls.
//!
//! ## Architecture
//!
//! - `schema/` - Typed contracts for config, outline, design, images and slides
//! - `validation/` - Bounds, overlap and WCAG contrast checks
//! - `prompts/` - Prompt builders for every stage
//! - `clients/` - Model and image search collaborators
//! - `models` - Which model serves which stage
//! - `pipeline/` - Stage orchestration and event streaming
//! - `error` - Errors that abort a run
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carousel_core::pipeline::GenerationPipeline;
//! use carousel_core::schema::{PipelineConfig, Quality};
//!
//! let config = PipelineConfig::new("5 habits of calm engineers").with_quality(Quality::Premium);
//! let handle = GenerationPipeline::from_api_key(api_key, config)?.spawn();
//! ```

pub mod clients;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod validation;

pub use error::PipelineError;
pub use pipeline::{GenerationPipeline, PipelineEvent, PipelineEventKind, PipelineHandle};
pub use schema::{credits_for_quality, CarouselData, PipelineConfig, Quality};
