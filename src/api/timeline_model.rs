use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::core::{
    ColumnAssignment, DayLayout, LayoutEngine, ScaleState, SnapConfiguration, TimedEvent, Viewport,
};
use crate::interaction::{EditSession, PinchZoomState, SnapAnimation};

/// Mutable timeline domain state owned by the engine facade.
///
/// Groups scale, visible days, the engine's own copy of provider events,
/// the latest layouts and the interaction state machines.
pub(super) struct TimelineModel {
    pub(super) viewport: Viewport,
    pub(super) scale: ScaleState,
    pub(super) layout_engine: LayoutEngine,
    pub(super) snap: SnapConfiguration,
    pub(super) visible_days: Vec<NaiveDate>,
    pub(super) events: IndexMap<NaiveDate, Vec<TimedEvent>>,
    pub(super) layouts: IndexMap<NaiveDate, DayLayout>,
    pub(super) scroll_offset: f64,
    pub(super) edit: EditSession,
    pub(super) edit_origin: Option<EditOrigin>,
    pub(super) pinch: PinchZoomState,
    pub(super) snap_animation: Option<SnapAnimation>,
}

/// Column placement the working frame was laid out with.
///
/// Vertical positions are measured against `day`; `origin_x` and `day_width`
/// are the column geometry the frame's horizontal position refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct EditOrigin {
    pub(super) day: NaiveDate,
    pub(super) assignment: ColumnAssignment,
    pub(super) origin_x: f64,
    pub(super) day_width: f64,
}

impl TimelineModel {
    #[must_use]
    pub(super) fn day_width(&self) -> f64 {
        let count = self.visible_days.len().max(1);
        f64::from(self.viewport.width) / count as f64
    }

    #[must_use]
    pub(super) fn day_index(&self, day: NaiveDate) -> Option<usize> {
        self.visible_days.iter().position(|visible| *visible == day)
    }

    #[must_use]
    pub(super) fn day_origin_x(&self, day: NaiveDate) -> Option<f64> {
        self.day_index(day)
            .map(|index| index as f64 * self.day_width())
    }

    /// Visible day whose column contains timeline-space `x`, clamped to the edges.
    #[must_use]
    pub(super) fn day_at_x(&self, x: f64) -> Option<NaiveDate> {
        let last = self.visible_days.len().checked_sub(1)?;
        let index = if x.is_finite() {
            (x / self.day_width()).floor().clamp(0.0, last as f64) as usize
        } else {
            0
        };
        self.visible_days.get(index).copied()
    }

    #[must_use]
    pub(super) fn content_height(&self) -> f64 {
        self.scale
            .content_height(self.layout_engine.style().vertical_inset)
    }

    #[must_use]
    pub(super) fn max_scroll_offset(&self) -> f64 {
        (self.content_height() - f64::from(self.viewport.height)).max(0.0)
    }

    #[must_use]
    pub(super) fn clamp_scroll_offset(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll_offset())
    }
}
