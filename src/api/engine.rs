use crate::core::{ScaleState, Viewport};
use crate::error::TimelineResult;
use crate::interaction::InteractionMode;
use crate::render::{DayColumn, RenderFrame, Renderer, WorkingFrame};

use super::{
    TimelineConfig, timeline_model::TimelineModel, timeline_runtime::TimelineRuntimeState,
};

/// Main orchestration facade consumed by host applications.
///
/// `TimelineEngine` coordinates the time scale, the engine's copy of provider
/// events, per-day layout, the edit session, pinch zoom and renderer calls.
/// Everything runs synchronously on the caller's thread.
pub struct TimelineEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: TimelineConfig,
    pub(super) model: TimelineModel,
    pub(super) runtime: TimelineRuntimeState,
}

impl<R: Renderer> TimelineEngine<R> {
    #[must_use]
    pub fn config(&self) -> TimelineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.model.viewport
    }

    #[must_use]
    pub fn scale(&self) -> ScaleState {
        self.model.scale
    }

    #[must_use]
    pub fn points_per_minute(&self) -> f64 {
        self.model.scale.points_per_minute()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        if self.model.pinch.is_active() {
            InteractionMode::Pinching
        } else if self.model.edit.is_active() {
            InteractionMode::Editing
        } else {
            InteractionMode::Idle
        }
    }

    /// Number of single-day layout passes run so far.
    #[must_use]
    pub fn layout_pass_count(&self) -> u64 {
        self.runtime.layout_pass_count
    }

    /// Lays out pending days and hands the resulting scene to the renderer.
    pub fn render(&mut self) -> TimelineResult<()> {
        self.relayout_if_needed();
        let frame = self.build_render_frame();
        self.renderer.render(&frame)?;
        self.emit_timeline_event(crate::extensions::TimelineEvent::Rendered);
        Ok(())
    }

    pub(super) fn build_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(
            self.model.viewport,
            self.model.scroll_offset,
            self.model.scale.points_per_minute(),
        );
        frame.layout_animations_enabled = self.layout_animations_enabled();
        frame.days = self
            .model
            .visible_days
            .iter()
            .filter_map(|day| {
                let layout = self.model.layouts.get(day)?.clone();
                Some(DayColumn {
                    origin_x: self.model.day_origin_x(*day)?,
                    layout,
                })
            })
            .collect();
        frame.working = self.model.edit.working().and_then(|event| {
            Some(WorkingFrame {
                event: event.clone(),
                frame: self.model.edit.frame()?,
                accented_time: self.model.edit.accented_time(),
            })
        });
        frame.snap_animation = self
            .model
            .snap_animation
            .map(|animation| (animation.event_id, animation.frame()));
        frame
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
