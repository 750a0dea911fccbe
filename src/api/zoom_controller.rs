use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::core::ScaleBounds;
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::TimelineEngine;
use super::validation::{pinch_sample_factor, validate_screen_offset};

impl<R: Renderer> TimelineEngine<R> {
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.model.pinch.is_active()
    }

    /// Layout animations are suppressed while a pinch is in flight.
    #[must_use]
    pub fn layout_animations_enabled(&self) -> bool {
        !self.model.pinch.is_active()
    }

    /// Number of coalesced zoom applications so far.
    #[must_use]
    pub fn zoom_flush_count(&self) -> u64 {
        self.runtime.zoom_flush_count
    }

    /// Starts a pinch anchored at viewport-space `focal_y`.
    ///
    /// The time under the focal point stays under it for the whole gesture.
    pub fn pinch_begin(&mut self, focal_y: f64) -> TimelineResult<()> {
        let focal_y = validate_screen_offset(focal_y, "pinch focal y")?;
        let anchor_minutes = self
            .mapper()
            .y_to_minutes(self.model.scroll_offset + focal_y);
        self.model.pinch.begin(
            anchor_minutes,
            focal_y,
            self.model.scale.points_per_minute(),
        );
        debug!(
            focal_y,
            anchor_minutes,
            points_per_minute = self.model.scale.points_per_minute(),
            "pinch started"
        );
        Ok(())
    }

    /// Records one raw scale delta. Applied on the next frame tick.
    pub fn pinch_change(&mut self, scale_delta: f64) -> TimelineResult<()> {
        let Some(factor) = pinch_sample_factor(scale_delta)? else {
            return Ok(());
        };
        if !self.model.pinch.is_active() {
            trace!(factor, "pinch delta ignored outside a gesture");
            return Ok(());
        }
        self.model.pinch.accumulate(factor);
        Ok(())
    }

    /// Applies any pending factor, ends the gesture and relayouts.
    pub fn pinch_end(&mut self) -> bool {
        if !self.model.pinch.is_active() {
            return false;
        }
        self.flush_pending_zoom();
        self.model.pinch.end();
        self.relayout();
        debug!(
            points_per_minute = self.model.scale.points_per_minute(),
            "pinch ended"
        );
        true
    }

    /// Drops any pending factor, ends the gesture and relayouts.
    pub fn pinch_cancel(&mut self) -> bool {
        if !self.model.pinch.is_active() {
            return false;
        }
        self.model.pinch.take_pending();
        self.model.pinch.end();
        self.relayout();
        debug!("pinch cancelled");
        true
    }

    /// Wall-clock time held under the pinch focal point.
    #[must_use]
    pub fn pinch_anchor_time(&self) -> Option<NaiveDateTime> {
        if !self.model.pinch.is_active() {
            return None;
        }
        let day = *self.model.visible_days.first()?;
        let mapper = self.mapper();
        mapper
            .y_to_time(mapper.minutes_to_y(self.model.pinch.anchor_minutes()), day)
            .ok()
    }

    pub(super) fn flush_pending_zoom(&mut self) -> bool {
        let Some(factor) = self.model.pinch.take_pending() else {
            return false;
        };
        self.runtime.zoom_flush_count += 1;
        if !self.model.scale.apply_factor(factor) {
            trace!(factor, "pinch factor left the scale unchanged");
            return false;
        }
        let anchor_minutes = self.model.pinch.anchor_minutes();
        let anchor_screen_y = self.model.pinch.anchor_screen_y();
        self.apply_scale_change(anchor_minutes, anchor_screen_y);
        true
    }

    /// Sets the scale directly, anchored at the viewport centre.
    ///
    /// Out-of-range values are clamped. Returns `true` when the scale changed.
    pub fn set_points_per_minute(&mut self, points_per_minute: f64) -> bool {
        let center = f64::from(self.model.viewport.height) / 2.0;
        let anchor_minutes = self
            .mapper()
            .y_to_minutes(self.model.scroll_offset + center);
        if !self.model.scale.set_points_per_minute(points_per_minute) {
            return false;
        }
        self.apply_scale_change(anchor_minutes, center);
        true
    }

    /// Replaces the configured scale bounds and re-clamps the scale.
    pub fn set_scale_bounds(&mut self, bounds: ScaleBounds) -> TimelineResult<bool> {
        let center = f64::from(self.model.viewport.height) / 2.0;
        let anchor_minutes = self
            .mapper()
            .y_to_minutes(self.model.scroll_offset + center);
        let changed = self.model.scale.set_bounds(bounds)?;
        if changed {
            self.apply_scale_change(anchor_minutes, center);
        }
        Ok(changed)
    }

    /// Relayouts every visible day at the new scale and keeps
    /// `anchor_minutes` at viewport-space `anchor_screen_y`.
    pub(super) fn apply_scale_change(&mut self, anchor_minutes: f64, anchor_screen_y: f64) {
        self.relayout();
        let anchor_y = self.mapper().minutes_to_y(anchor_minutes);
        self.model.scroll_offset = self.model.clamp_scroll_offset(anchor_y - anchor_screen_y);
        self.refresh_working_frame();
        trace!(
            points_per_minute = self.model.scale.points_per_minute(),
            scroll_offset = self.model.scroll_offset,
            "scale applied"
        );
        self.emit_timeline_event(TimelineEvent::ScaleChanged {
            points_per_minute: self.model.scale.points_per_minute(),
        });
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.model.scroll_offset
    }

    /// Scrolls the content. Returns the clamped offset actually applied.
    pub fn set_scroll_offset(&mut self, offset: f64) -> TimelineResult<f64> {
        let offset = validate_screen_offset(offset, "scroll offset")?;
        self.model.scroll_offset = self.model.clamp_scroll_offset(offset);
        Ok(self.model.scroll_offset)
    }

    /// Scrolls so that `time` on the first visible day sits at the viewport top.
    pub fn scroll_to_time(&mut self, time: NaiveDateTime) -> f64 {
        let Some(day) = self.model.visible_days.first().copied() else {
            return self.model.scroll_offset;
        };
        let y = self.mapper().time_to_y(time, day);
        self.model.scroll_offset = self.model.clamp_scroll_offset(y);
        self.model.scroll_offset
    }
}
