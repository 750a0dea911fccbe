use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DayLayout, EventHit, EventId, LayoutFrame, TimeCoordinateMapper, Viewport};
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::TimelineEngine;

/// Hit-test result in timeline space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineHit {
    pub day: NaiveDate,
    pub hit: EventHit,
}

impl<R: Renderer> TimelineEngine<R> {
    pub(super) fn mapper(&self) -> TimeCoordinateMapper {
        self.model.layout_engine.mapper(self.model.scale)
    }

    /// Invalidates every visible day and lays them out immediately.
    pub fn relayout(&mut self) -> usize {
        self.runtime.pending_layout.mark_all();
        self.relayout_if_needed()
    }

    /// Lays out pending days only. Returns the number of days laid out.
    pub fn relayout_if_needed(&mut self) -> usize {
        if self.runtime.pending_layout.is_empty() {
            return 0;
        }
        let days = self.runtime.pending_layout.take(&self.model.visible_days);
        let day_width = self.model.day_width();
        for day in &days {
            let events = self.model.events.get(day).map(Vec::as_slice).unwrap_or(&[]);
            let layout = self
                .model
                .layout_engine
                .layout_day(events, *day, day_width, self.model.scale);
            self.model.layouts.insert(*day, layout);
            self.runtime.layout_pass_count += 1;
        }
        let visible_days = &self.model.visible_days;
        self.model
            .layouts
            .retain(|day, _| visible_days.contains(day));

        if days.is_empty() {
            return 0;
        }
        let count = days.len();
        self.emit_timeline_event(TimelineEvent::DaysLaidOut { days });
        count
    }

    #[must_use]
    pub fn day_layout(&self, day: NaiveDate) -> Option<&DayLayout> {
        self.model.layouts.get(&day)
    }

    /// Latest frame of `id` on `day`, in timeline space.
    #[must_use]
    pub fn event_frame(&self, day: NaiveDate, id: EventId) -> Option<LayoutFrame> {
        let origin_x = self.model.day_origin_x(day)?;
        let frame = self.model.layouts.get(&day)?.frame(id)?;
        Some(frame.translated(origin_x, 0.0))
    }

    /// Resolves the timed event under a point.
    ///
    /// `x` is measured from the leading edge of the first visible day and `y`
    /// from the top of the scrollable content.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<TimelineHit> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 {
            return None;
        }
        let day = self.model.day_at_x(x)?;
        let origin_x = self.model.day_origin_x(day)?;
        let mut hit = self.model.layouts.get(&day)?.hit_test(
            x - origin_x,
            y,
            self.config.resize_handle_extent_px,
        )?;
        hit.frame = hit.frame.translated(origin_x, 0.0);
        Some(TimelineHit { day, hit })
    }

    /// Same as [`Self::hit_test`] with `y` measured from the viewport top.
    #[must_use]
    pub fn hit_test_screen(&self, x: f64, screen_y: f64) -> Option<TimelineHit> {
        self.hit_test(x, screen_y + self.model.scroll_offset)
    }

    /// Content-space y of `time` relative to `day`.
    #[must_use]
    pub fn map_time_to_y(&self, time: NaiveDateTime, day: NaiveDate) -> f64 {
        self.mapper().time_to_y(time, day)
    }

    /// Wall-clock time at content-space `y` relative to `day`.
    pub fn map_y_to_time(&self, y: f64, day: NaiveDate) -> TimelineResult<NaiveDateTime> {
        self.mapper().y_to_time(y, day)
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.model.content_height()
    }

    /// Resizes the timeline container, anchoring the time at the viewport centre.
    pub fn set_viewport(&mut self, viewport: Viewport) -> TimelineResult<()> {
        let viewport = viewport.ensure_valid()?;
        if viewport == self.model.viewport {
            return Ok(());
        }
        let old_center = f64::from(self.model.viewport.height) / 2.0;
        let anchor_minutes = self
            .mapper()
            .y_to_minutes(self.model.scroll_offset + old_center);

        self.model.viewport = viewport;
        let scale_changed = self.model.scale.set_container_height(
            f64::from(viewport.height),
            self.model.layout_engine.style().vertical_inset,
        );
        debug!(
            width = viewport.width,
            height = viewport.height,
            scale_changed,
            "viewport resized"
        );
        self.runtime.pending_layout.mark_all();
        if scale_changed {
            self.apply_scale_change(anchor_minutes, f64::from(viewport.height) / 2.0);
        } else {
            self.model.scroll_offset = self.model.clamp_scroll_offset(self.model.scroll_offset);
            self.refresh_working_frame();
        }
        Ok(())
    }
}
