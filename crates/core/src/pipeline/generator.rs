//! # Generation Pipeline
//!
//! Turns a topic into a laid-out, validated carousel.
//!
//! ```text
//! basic:             generate → done
//! standard/premium:  content → design → [images] → layout → validation
//!                        → [refinement ≤ N, premium only] → done
//! ```
//!
//! Every call is awaited in order on a single task. Progress is streamed
//! over an optional `mpsc` channel; a dropped receiver never fails the run.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use super::events::{PipelineEvent, PipelineEventKind};
use super::stages::{PipelineStage, RunState, MAX_REFINEMENT_ATTEMPTS};
use crate::clients::{request_structured, ImageSearch, ImageSearchOptions, ModelClient, OpenAiClient};
use crate::error::PipelineError;
use crate::models::ModelConfig;
use crate::prompts;
use crate::schema::{
    CarouselData, ContentOutline, DesignSystem, ImagePlan, ImageType, PipelineConfig, Quality,
    SlideData, SlideImageData,
};
use crate::validation::{validate_carousel, ValidationOptions, ValidationResult};

/// Buffer size of the channel created by [`GenerationPipeline::spawn`]
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A spawned run
pub struct PipelineHandle {
    /// Events in emission order, ends when the run finishes
    pub events: ReceiverStream<PipelineEvent>,
    /// Resolves to the final carousel
    pub task: JoinHandle<Result<CarouselData, PipelineError>>,
    /// Trip to stop the run at the next checkpoint
    pub cancel: CancellationToken,
}

/// One generation run. Build it, then call [`run`](Self::run) or
/// [`spawn`](Self::spawn).
pub struct GenerationPipeline {
    model: Arc<dyn ModelClient>,
    images: Option<Arc<dyn ImageSearch>>,
    config: PipelineConfig,
    models: ModelConfig,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
    cancel: CancellationToken,
    max_refinement_attempts: u32,
}

impl GenerationPipeline {
    pub fn new(model: Arc<dyn ModelClient>, config: PipelineConfig) -> Self {
        Self {
            model,
            images: None,
            config,
            models: ModelConfig::default(),
            event_tx: None,
            cancel: CancellationToken::new(),
            max_refinement_attempts: MAX_REFINEMENT_ATTEMPTS,
        }
    }

    /// Pipeline backed by the OpenAI API with default models
    pub fn from_api_key(api_key: impl Into<String>, config: PipelineConfig) -> anyhow::Result<Self> {
        let models = ModelConfig::new(api_key);
        let client = OpenAiClient::new(&models)?;
        Ok(Self::new(Arc::new(client), config).with_models(models))
    }

    /// Enable the images stage
    pub fn with_image_search(mut self, images: Arc<dyn ImageSearch>) -> Self {
        self.images = Some(images);
        self
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Model names per stage. The client itself is not rebuilt.
    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    pub fn with_max_refinement_attempts(mut self, attempts: u32) -> Self {
        self.max_refinement_attempts = attempts;
        self
    }

    /// Run on a new task, streaming events through the returned handle
    pub fn spawn(self) -> PipelineHandle {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = self.cancel.clone();
        let pipeline = self.with_event_channel(tx);
        let task = tokio::spawn(pipeline.run());
        PipelineHandle {
            events: ReceiverStream::new(rx),
            task,
            cancel,
        }
    }

    /// Run to completion.
    ///
    /// Validation findings never fail the run; they are reported through
    /// events. Model, transport and schema failures emit an `error` event
    /// and are returned.
    #[tracing::instrument(
        skip(self),
        fields(
            topic = %self.config.topic.chars().take(50).collect::<String>(),
            quality = %self.config.quality
        )
    )]
    pub async fn run(self) -> Result<CarouselData, PipelineError> {
        self.config.validate()?;

        if self.config.wants_images() && self.images.is_none() {
            tracing::warn!("images requested but no image search configured, skipping images stage");
        }

        let mut state = RunState::new(
            self.config.quality,
            self.config.wants_images() && self.images.is_some(),
        )
        .with_max_refinement_attempts(self.max_refinement_attempts);

        self.emit(PipelineEvent::new(PipelineEventKind::Start).with_data(json!({
            "topic": self.config.topic,
            "quality": self.config.quality,
            "slideCount": self.config.slide_count,
            "credits": self.config.quality.credits(),
        })))
        .await;

        let result = match self.config.quality {
            Quality::Basic => self.run_basic(&mut state).await,
            Quality::Standard | Quality::Premium => self.run_staged(&mut state).await,
        };

        match result {
            Ok(carousel) => {
                tracing::info!(slides = carousel.slides.len(), "carousel generated");
                Ok(carousel)
            }
            Err(err) => {
                let stage = err.stage().unwrap_or(state.stage);
                state.fail();
                if err.is_cancelled() {
                    tracing::info!(stage = %stage, "generation cancelled");
                } else {
                    tracing::error!(stage = %stage, error = %err, "generation failed");
                }
                self.emit(PipelineEvent::new(PipelineEventKind::Error).with_data(json!({
                    "message": err.to_string(),
                    "stage": stage,
                    "cancelled": err.is_cancelled(),
                })))
                .await;
                Err(err)
            }
        }
    }

    async fn run_basic(&self, state: &mut RunState) -> Result<CarouselData, PipelineError> {
        let stage = PipelineStage::Generate;
        self.begin_stage(stage).await?;

        let mut carousel: CarouselData = request_structured(
            self.model.as_ref(),
            self.models.model_for(self.config.quality, stage),
            prompts::basic_carousel(&self.config),
            "carousel",
            stage,
        )
        .await?;

        if carousel.slides.is_empty() {
            return Err(PipelineError::EmptyResponse {
                stage,
                what: "carousel",
            });
        }
        if carousel.slides.len() > self.config.slide_count {
            tracing::warn!(
                requested = self.config.slide_count,
                received = carousel.slides.len(),
                "model returned extra slides, truncating"
            );
            carousel.slides.truncate(self.config.slide_count);
        }

        self.emit(PipelineEvent::step_complete(
            stage,
            json!({ "slideCount": carousel.slides.len() }),
        ))
        .await;
        state.advance();

        self.emit_slides(&carousel).await;
        self.emit(PipelineEvent::new(PipelineEventKind::Done).with_data(json!({
            "slidesCreated": carousel.slides.len(),
        })))
        .await;

        Ok(carousel)
    }

    async fn run_staged(&self, state: &mut RunState) -> Result<CarouselData, PipelineError> {
        let outline = self.generate_outline().await?;
        state.advance();

        let design = self.generate_design().await?;
        state.advance();

        let images = match (state.stage, self.images.as_deref()) {
            (PipelineStage::Images, Some(search)) => {
                let images = self.resolve_images(search, &outline).await?;
                state.advance();
                images
            }
            _ => Vec::new(),
        };

        let mut carousel = self.layout_slides(&design, &outline, &images).await?;
        state.advance();

        let options = ValidationOptions::for_config(&self.config);
        let mut validation = validate_carousel(&carousel, &options);
        let premium = self.config.quality == Quality::Premium;

        if !validation.is_valid {
            self.begin_stage(PipelineStage::Validation).await?;
            tracing::info!(
                errors = validation.errors.len(),
                warnings = validation.warnings.len(),
                "validation found issues"
            );
            self.emit(validation_event(&validation, json!({ "autoFix": premium })))
                .await;

            while !validation.is_valid && state.begin_refinement() {
                self.refine(
                    state,
                    &validation,
                    &mut carousel,
                    &design,
                    &outline,
                    &images,
                )
                .await?;
                validation = validate_carousel(&carousel, &options);
            }

            if !validation.is_valid && premium {
                tracing::warn!(
                    attempts = state.refinement_attempts,
                    errors = validation.errors.len(),
                    "refinement attempts exhausted, returning best effort"
                );
                self.emit(validation_event(
                    &validation,
                    json!({ "autoFix": true, "maxAttemptsReached": true }),
                ))
                .await;
            }

            self.emit(PipelineEvent::step_complete(
                PipelineStage::Validation,
                json!({
                    "valid": validation.is_valid,
                    "errors": validation.errors.len(),
                    "warnings": validation.warnings.len(),
                    "refinementAttempts": state.refinement_attempts,
                }),
            ))
            .await;
        }
        state.advance();

        self.emit_slides(&carousel).await;
        self.emit(PipelineEvent::new(PipelineEventKind::Done).with_data(json!({
            "slidesCreated": carousel.slides.len(),
            "title": outline.title,
            "valid": validation.is_valid,
            "errors": validation.errors.len(),
            "warnings": validation.warnings.len(),
            "refinementAttempts": state.refinement_attempts,
        })))
        .await;

        Ok(carousel)
    }

    async fn generate_outline(&self) -> Result<ContentOutline, PipelineError> {
        let stage = PipelineStage::Content;
        self.begin_stage(stage).await?;

        let mut outline: ContentOutline = request_structured(
            self.model.as_ref(),
            self.models.model_for(self.config.quality, stage),
            prompts::content_outline(&self.config),
            "content_outline",
            stage,
        )
        .await?;

        if outline.slides.is_empty() {
            return Err(PipelineError::EmptyResponse {
                stage,
                what: "content outline",
            });
        }
        if outline.slides.len() > self.config.slide_count {
            tracing::warn!(
                requested = self.config.slide_count,
                received = outline.slides.len(),
                "outline has extra slides, truncating"
            );
            outline.slides.truncate(self.config.slide_count);
        }

        self.emit(PipelineEvent::step_complete(
            stage,
            json!({ "title": outline.title, "slideCount": outline.slides.len() }),
        ))
        .await;
        Ok(outline)
    }

    async fn generate_design(&self) -> Result<DesignSystem, PipelineError> {
        let stage = PipelineStage::Design;
        self.begin_stage(stage).await?;

        let design: DesignSystem = request_structured(
            self.model.as_ref(),
            self.models.model_for(self.config.quality, stage),
            prompts::design_system(&self.config),
            "design_system",
            stage,
        )
        .await?;

        self.emit(PipelineEvent::step_complete(
            stage,
            json!({ "design": design }),
        ))
        .await;
        Ok(design)
    }

    /// One entry per outline slide, in slide order. Search failures degrade
    /// the slide to no image.
    async fn resolve_images(
        &self,
        search: &dyn ImageSearch,
        outline: &ContentOutline,
    ) -> Result<Vec<SlideImageData>, PipelineError> {
        let stage = PipelineStage::Images;
        self.begin_stage(stage).await?;

        let plan: ImagePlan = request_structured(
            self.model.as_ref(),
            self.models.model_for(self.config.quality, stage),
            prompts::image_keywords(&self.config, outline),
            "image_plan",
            stage,
        )
        .await?;

        let options = ImageSearchOptions::for_canvas(self.config.canvas);
        let mut resolved: Vec<SlideImageData> = (0..outline.slides.len())
            .map(SlideImageData::none)
            .collect();

        for entry in plan
            .slides
            .iter()
            .filter(|entry| entry.use_image && entry.image_type != ImageType::None)
        {
            let Some(slot) = resolved.get_mut(entry.slide_index) else {
                tracing::warn!(slide = entry.slide_index, "image plan refers to unknown slide");
                continue;
            };
            match search.search(&entry.keywords, &options).await {
                Ok(results) => match results.into_iter().next() {
                    Some(image) => {
                        slot.image_type = entry.image_type;
                        slot.image = Some(image);
                    }
                    None => {
                        tracing::warn!(slide = entry.slide_index, keywords = %entry.keywords, "no images found");
                    }
                },
                Err(err) => {
                    tracing::warn!(
                        slide = entry.slide_index,
                        error = %err,
                        "image search failed, continuing without image"
                    );
                }
            }
        }

        let found = resolved.iter().filter(|data| data.image.is_some()).count();
        self.emit(PipelineEvent::step_complete(
            stage,
            json!({ "imagesFound": found, "images": resolved }),
        ))
        .await;
        Ok(resolved)
    }

    async fn layout_slides(
        &self,
        design: &DesignSystem,
        outline: &ContentOutline,
        images: &[SlideImageData],
    ) -> Result<CarouselData, PipelineError> {
        let stage = PipelineStage::Layout;
        self.begin_stage(stage).await?;

        let model = self.models.model_for(self.config.quality, stage);
        let total = outline.slides.len();
        let mut slides = Vec::with_capacity(total);

        for (index, content) in outline.slides.iter().enumerate() {
            self.check_cancelled()?;
            let image = images.get(index);

            let mut slide: SlideData = request_structured(
                self.model.as_ref(),
                model,
                prompts::slide_layout(&self.config, design, content, index, total, image),
                "slide_layout",
                stage,
            )
            .await?;
            attach_background(&mut slide, image);
            slides.push(slide);

            tracing::debug!(slide = index, total, "slide laid out");
            self.emit(progress(stage, index + 1, total, format!("Slide {} of {} laid out", index + 1, total)))
                .await;
        }

        self.emit(PipelineEvent::step_complete(stage, json!({ "slideCount": total })))
            .await;
        Ok(CarouselData { slides })
    }

    /// One refinement pass over every invalid slide
    async fn refine(
        &self,
        state: &RunState,
        validation: &ValidationResult,
        carousel: &mut CarouselData,
        design: &DesignSystem,
        outline: &ContentOutline,
        images: &[SlideImageData],
    ) -> Result<(), PipelineError> {
        let stage = PipelineStage::Refinement;
        let invalid = validation.invalid_slide_indices();

        tracing::info!(
            attempt = state.refinement_attempts,
            slides = ?invalid,
            "starting refinement pass"
        );
        self.emit(PipelineEvent::new(PipelineEventKind::RefinementStart).with_data(json!({
            "attempt": state.refinement_attempts,
            "maxAttempts": state.max_refinement_attempts,
            "slides": invalid,
        })))
        .await;

        let model = self.models.model_for(self.config.quality, stage);
        for (position, &index) in invalid.iter().enumerate() {
            self.check_cancelled()?;
            let (Some(content), Some(current)) =
                (outline.slides.get(index), carousel.slides.get(index))
            else {
                continue;
            };

            let errors = validation.errors_for_slide(index);
            let prompt = prompts::slide_refinement(&self.config, design, content, current, &errors);
            let mut repaired: SlideData =
                request_structured(self.model.as_ref(), model, prompt, "slide_refinement", stage)
                    .await?;
            attach_background(&mut repaired, images.get(index));

            if let Some(slot) = carousel.slides.get_mut(index) {
                *slot = repaired;
            }

            self.emit(
                progress(
                    stage,
                    position + 1,
                    invalid.len(),
                    format!("Slide {} refined", index + 1),
                )
                .with_data_field("slideIndex", json!(index)),
            )
            .await;
        }
        Ok(())
    }

    async fn begin_stage(&self, stage: PipelineStage) -> Result<(), PipelineError> {
        self.check_cancelled()?;
        tracing::info!(stage = %stage, "stage started");
        self.emit(PipelineEvent::step_start(stage)).await;
        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    async fn emit_slides(&self, carousel: &CarouselData) {
        let total = carousel.slides.len();
        for (index, slide) in carousel.slides.iter().enumerate() {
            self.emit(PipelineEvent::new(PipelineEventKind::SlideData).with_data(json!({
                "slideIndex": index,
                "slide": slide,
            })))
            .await;
            self.emit(PipelineEvent::new(PipelineEventKind::SlideComplete).with_data(json!({
                "slideIndex": index,
                "total": total,
            })))
            .await;
        }
    }

    /// Emit an event
    async fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

fn progress(stage: PipelineStage, current: usize, total: usize, message: String) -> PipelineEvent {
    PipelineEvent::new(PipelineEventKind::Progress).with_data(json!({
        "step": stage,
        "current": current,
        "total": total,
        "message": message,
    }))
}

fn validation_event(validation: &ValidationResult, extra: serde_json::Value) -> PipelineEvent {
    let mut data = json!({
        "errors": validation.errors,
        "warnings": validation.warnings,
    });
    if let (Some(target), serde_json::Value::Object(extra)) = (data.as_object_mut(), extra) {
        target.extend(extra);
    }
    PipelineEvent::new(PipelineEventKind::ValidationError).with_data(data)
}

/// Background photos come from the image stage, never from the model
fn attach_background(slide: &mut SlideData, image: Option<&SlideImageData>) {
    slide.background_image = match image {
        Some(data) if data.image_type == ImageType::Background => data.image.clone(),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ImageAttribution, ResolvedImage};

    fn photo() -> ResolvedImage {
        ResolvedImage {
            url: "https://images.example/1.jpg".to_string(),
            width: 1080,
            height: 1350,
            attribution: ImageAttribution {
                photographer: "Ada".to_string(),
                profile_url: "https://example.com/ada".to_string(),
            },
        }
    }

    fn empty_slide() -> SlideData {
        SlideData {
            background_color: "#ffffff".to_string(),
            elements: vec![],
            background_image: None,
        }
    }

    #[test]
    fn test_attach_background_only_for_background_images() {
        let mut slide = empty_slide();
        let background = SlideImageData {
            slide_index: 0,
            image_type: ImageType::Background,
            image: Some(photo()),
        };
        attach_background(&mut slide, Some(&background));
        assert_eq!(slide.background_image, Some(photo()));

        let element = SlideImageData {
            image_type: ImageType::Element,
            ..background
        };
        attach_background(&mut slide, Some(&element));
        assert!(slide.background_image.is_none());

        attach_background(&mut slide, None);
        assert!(slide.background_image.is_none());
    }

    #[test]
    fn test_validation_event_merges_flags() {
        let validation = ValidationResult {
            is_valid: false,
            errors: vec![],
            warnings: vec![],
        };
        let event = validation_event(&validation, json!({ "maxAttemptsReached": true }));
        assert_eq!(event.kind, PipelineEventKind::ValidationError);
        assert_eq!(event.data["maxAttemptsReached"], true);
        assert!(event.data["errors"].is_array());
    }

    #[test]
    fn test_progress_event_shape() {
        let event = progress(PipelineStage::Layout, 2, 5, "Slide 2 of 5 laid out".to_string());
        assert_eq!(event.step(), Some("layout"));
        assert_eq!(event.data["current"], 2);
        assert_eq!(event.data["total"], 5);
    }
}
