use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{DayLayout, Viewport};
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::{EditMode, InteractionMode};
use crate::render::{Renderer, WorkingFrame};

use super::TimelineEngine;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    pub viewport: Viewport,
    pub points_per_minute: f64,
    pub scroll_offset: f64,
    pub content_height: f64,
    pub visible_days: Vec<NaiveDate>,
    pub layouts: Vec<DayLayout>,
    pub interaction_mode: InteractionMode,
    pub edit_mode: EditMode,
    pub working: Option<WorkingFrame>,
}

impl<R: Renderer> TimelineEngine<R> {
    /// Builds a snapshot from the latest layouts; pending days are not laid out.
    #[must_use]
    pub fn snapshot(&self) -> TimelineSnapshot {
        let frame = self.build_render_frame();
        TimelineSnapshot {
            viewport: self.model.viewport,
            points_per_minute: self.model.scale.points_per_minute(),
            scroll_offset: self.model.scroll_offset,
            content_height: self.model.content_height(),
            visible_days: self.model.visible_days.clone(),
            layouts: frame.days.into_iter().map(|column| column.layout).collect(),
            interaction_mode: self.interaction_mode(),
            edit_mode: self.model.edit.mode(),
            working: frame.working,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| TimelineError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
