use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::{DayLayout, EventId, LayoutFrame, TimedEvent, Viewport};
use crate::error::{TimelineError, TimelineResult};

/// One visible day column and its latest layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    /// Leading edge of the column in timeline space.
    pub origin_x: f64,
    pub layout: DayLayout,
}

/// Working copy of the active edit session, drawn above the day columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingFrame {
    pub event: TimedEvent,
    pub frame: LayoutFrame,
    pub accented_time: Option<NaiveDateTime>,
}

/// Backend-agnostic scene for one timeline draw pass.
///
/// Day frames fully replace whatever the consumer drew for those days before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub scroll_offset: f64,
    pub points_per_minute: f64,
    pub days: Vec<DayColumn>,
    pub working: Option<WorkingFrame>,
    /// Committed event still easing into its snapped position.
    pub snap_animation: Option<(EventId, LayoutFrame)>,
    pub layout_animations_enabled: bool,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, scroll_offset: f64, points_per_minute: f64) -> Self {
        Self {
            viewport,
            scroll_offset,
            points_per_minute,
            days: Vec::new(),
            working: None,
            snap_animation: None,
            layout_animations_enabled: true,
        }
    }

    #[must_use]
    pub fn timed_frame_count(&self) -> usize {
        self.days
            .iter()
            .map(|column| column.layout.timed_frames.len())
            .sum()
    }

    pub fn validate(&self) -> TimelineResult<()> {
        self.viewport.ensure_valid()?;
        if !self.scroll_offset.is_finite() {
            return Err(TimelineError::InvalidData(
                "scroll offset must be finite".to_owned(),
            ));
        }

        for column in &self.days {
            for frame in column
                .layout
                .timed_frames
                .values()
                .chain(column.layout.all_day_frames.values())
            {
                frame.validate()?;
            }
        }
        if let Some(working) = &self.working {
            working.frame.validate()?;
        }
        if let Some((_, frame)) = self.snap_animation {
            frame.validate()?;
        }

        Ok(())
    }
}
