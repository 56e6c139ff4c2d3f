//! # Collaborator Clients
//!
//! Network seams the pipeline depends on. Both are trait objects so callers
//! and tests can substitute their own.
//!
//! - `model` - Structured-output model contract and the typed request helper
//! - `openai` - OpenAI-compatible implementation
//! - `strict_schema` - schemars → strict structured-output schema rewriting
//! - `images` - Stock image search contract
//! - `unsplash` - Unsplash implementation

pub mod images;
pub mod model;
pub mod openai;
pub mod strict_schema;
pub mod unsplash;

pub use images::{ImageSearch, ImageSearchOptions, Orientation};
pub use model::{request_structured, ModelClient, StructuredRequest};
pub use openai::OpenAiClient;
pub use unsplash::UnsplashClient;
