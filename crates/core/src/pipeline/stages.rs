//! # Pipeline Stages
//!
//! Defines the stages of a generation run and the state machine that moves
//! between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::Quality;

/// Default cap on refinement passes
pub const MAX_REFINEMENT_ATTEMPTS: u32 = 3;

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Single-call basic generation
    Generate,
    /// Content outline
    Content,
    /// Design system
    Design,
    /// Image keywords and stock search
    Images,
    /// Per-slide layout
    Layout,
    /// Geometry and contrast checks
    Validation,
    /// Targeted repair of invalid slides (premium only)
    Refinement,
    /// Complete
    Done,
    /// Failed
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Generate => "generate",
            PipelineStage::Content => "content",
            PipelineStage::Design => "design",
            PipelineStage::Images => "images",
            PipelineStage::Layout => "layout",
            PipelineStage::Validation => "validation",
            PipelineStage::Refinement => "refinement",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }

    /// Status line shown while the stage runs
    pub fn start_message(&self) -> &'static str {
        match self {
            PipelineStage::Generate => "Generating carousel...",
            PipelineStage::Content => "Writing slide content...",
            PipelineStage::Design => "Creating design system...",
            PipelineStage::Images => "Finding images...",
            PipelineStage::Layout => "Laying out slides...",
            PipelineStage::Validation => "Checking layout quality...",
            PipelineStage::Refinement => "Fixing layout issues...",
            PipelineStage::Done => "Done",
            PipelineStage::Failed => "Failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The run state machine
#[derive(Debug, Clone)]
pub struct RunState {
    /// Current stage
    pub stage: PipelineStage,
    pub quality: Quality,
    /// Whether the images stage is part of this run
    pub use_images: bool,
    /// Refinement passes started so far
    pub refinement_attempts: u32,
    /// Maximum refinement passes before giving up
    pub max_refinement_attempts: u32,
}

impl RunState {
    pub fn new(quality: Quality, use_images: bool) -> Self {
        Self {
            stage: if quality == Quality::Basic {
                PipelineStage::Generate
            } else {
                PipelineStage::Content
            },
            quality,
            use_images: use_images && quality != Quality::Basic,
            refinement_attempts: 0,
            max_refinement_attempts: MAX_REFINEMENT_ATTEMPTS,
        }
    }

    pub fn with_max_refinement_attempts(mut self, attempts: u32) -> Self {
        self.max_refinement_attempts = attempts;
        self
    }

    /// Advance to the next stage on the happy path
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            PipelineStage::Generate => PipelineStage::Done,
            PipelineStage::Content => PipelineStage::Design,
            PipelineStage::Design if self.use_images => PipelineStage::Images,
            PipelineStage::Design => PipelineStage::Layout,
            PipelineStage::Images => PipelineStage::Layout,
            PipelineStage::Layout => PipelineStage::Validation,
            PipelineStage::Validation => PipelineStage::Done,
            PipelineStage::Refinement => PipelineStage::Done,
            PipelineStage::Done => PipelineStage::Done,
            PipelineStage::Failed => PipelineStage::Failed,
        };
    }

    /// Start another refinement pass; false once premium's budget is spent
    /// or for tiers that never refine
    pub fn begin_refinement(&mut self) -> bool {
        if self.quality != Quality::Premium
            || self.refinement_attempts >= self.max_refinement_attempts
        {
            return false;
        }
        self.refinement_attempts += 1;
        self.stage = PipelineStage::Refinement;
        true
    }

    /// Fail the run
    pub fn fail(&mut self) {
        self.stage = PipelineStage::Failed;
    }

    /// Check if the run has terminated
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, PipelineStage::Done | PipelineStage::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(mut state: RunState) -> Vec<PipelineStage> {
        let mut seen = vec![state.stage];
        while !state.is_complete() {
            state.advance();
            seen.push(state.stage);
        }
        seen
    }

    #[test]
    fn test_basic_is_single_stage() {
        let stages = walk(RunState::new(Quality::Basic, true));
        assert_eq!(stages, vec![PipelineStage::Generate, PipelineStage::Done]);
    }

    #[test]
    fn test_images_stage_is_optional() {
        use PipelineStage::*;
        assert_eq!(
            walk(RunState::new(Quality::Standard, false)),
            vec![Content, Design, Layout, Validation, Done]
        );
        assert_eq!(
            walk(RunState::new(Quality::Premium, true)),
            vec![Content, Design, Images, Layout, Validation, Done]
        );
    }

    #[test]
    fn test_refinement_budget() {
        let mut state = RunState::new(Quality::Premium, false);
        state.stage = PipelineStage::Validation;

        assert!(state.begin_refinement());
        assert!(state.begin_refinement());
        assert!(state.begin_refinement());
        assert_eq!(state.stage, PipelineStage::Refinement);
        assert!(!state.begin_refinement());
        assert_eq!(state.refinement_attempts, 3);

        state.advance();
        assert_eq!(state.stage, PipelineStage::Done);
    }

    #[test]
    fn test_standard_never_refines() {
        let mut state = RunState::new(Quality::Standard, false);
        assert!(!state.begin_refinement());
        assert_eq!(state.refinement_attempts, 0);
    }

    #[test]
    fn test_fail_is_terminal() {
        let mut state = RunState::new(Quality::Standard, false);
        state.fail();
        state.advance();
        assert!(state.is_complete());
        assert_eq!(state.stage, PipelineStage::Failed);
    }
}
