use serde::{Deserialize, Serialize};

use crate::error::TimelineResult;
use crate::render::Renderer;

use super::{TimelineEngine, validation::validate_frame_delta_seconds};

/// Work performed by one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameTickOutcome {
    /// A coalesced pinch factor was applied.
    pub zoom_applied: bool,
    pub days_laid_out: usize,
    /// The post-commit snap animation still needs frames.
    pub animation_running: bool,
}

impl<R: Renderer> TimelineEngine<R> {
    /// Runs once per display frame: applies the pending zoom factor, lays out
    /// dirty days and advances the snap animation.
    pub fn tick(&mut self, delta_seconds: f64) -> TimelineResult<FrameTickOutcome> {
        let delta_seconds = validate_frame_delta_seconds(delta_seconds)?;
        let passes_before = self.runtime.layout_pass_count;

        let zoom_applied = self.flush_pending_zoom();
        self.relayout_if_needed();

        let animation_running = match &mut self.model.snap_animation {
            Some(animation) => animation.step(delta_seconds),
            None => false,
        };
        if !animation_running {
            self.model.snap_animation = None;
        }

        Ok(FrameTickOutcome {
            zoom_applied,
            days_laid_out: (self.runtime.layout_pass_count - passes_before) as usize,
            animation_running,
        })
    }

    /// `true` when the next tick has zoom, layout or animation work to do.
    #[must_use]
    pub fn has_pending_frame_work(&self) -> bool {
        self.model.pinch.has_pending()
            || !self.runtime.pending_layout.is_empty()
            || self.model.snap_animation.is_some()
    }
}
