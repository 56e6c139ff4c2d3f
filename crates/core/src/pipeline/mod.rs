//! # Generation Pipeline
//!
//! Orchestrates the model calls that turn a topic into a carousel.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Topic → Content Outline → Design System → [Images] → Layout → Validation ⟷ Refinement
//! ```

pub mod events;
pub mod generator;
pub mod stages;

pub use events::{PipelineEvent, PipelineEventKind};
pub use generator::{GenerationPipeline, PipelineHandle, EVENT_CHANNEL_CAPACITY};
pub use stages::{PipelineStage, RunState, MAX_REFINEMENT_ATTEMPTS};
