use serde::{Deserialize, Serialize};

/// Accumulated state of one continuous pinch gesture.
///
/// Raw gesture deltas only multiply `pending_factor`; the engine applies the
/// product at most once per frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchZoomState {
    active: bool,
    anchor_minutes: f64,
    anchor_screen_y: f64,
    initial_points_per_minute: f64,
    pending_factor: f64,
    dirty: bool,
}

impl Default for PinchZoomState {
    fn default() -> Self {
        Self {
            active: false,
            anchor_minutes: 0.0,
            anchor_screen_y: 0.0,
            initial_points_per_minute: 0.0,
            pending_factor: 1.0,
            dirty: false,
        }
    }
}

impl PinchZoomState {
    #[must_use]
    pub fn is_active(self) -> bool {
        self.active
    }

    /// Minutes since the first visible day's midnight kept under the focal point.
    #[must_use]
    pub fn anchor_minutes(self) -> f64 {
        self.anchor_minutes
    }

    #[must_use]
    pub fn anchor_screen_y(self) -> f64 {
        self.anchor_screen_y
    }

    #[must_use]
    pub fn initial_points_per_minute(self) -> f64 {
        self.initial_points_per_minute
    }

    #[must_use]
    pub fn pending_factor(self) -> f64 {
        self.pending_factor
    }

    #[must_use]
    pub fn has_pending(self) -> bool {
        self.dirty
    }

    pub fn begin(&mut self, anchor_minutes: f64, anchor_screen_y: f64, points_per_minute: f64) {
        *self = Self {
            active: true,
            anchor_minutes,
            anchor_screen_y,
            initial_points_per_minute: points_per_minute,
            ..Self::default()
        };
    }

    pub fn accumulate(&mut self, factor: f64) {
        if !self.active {
            return;
        }
        self.pending_factor *= factor;
        self.dirty = true;
    }

    /// Returns the accumulated factor and resets it to neutral.
    pub fn take_pending(&mut self) -> Option<f64> {
        if !self.dirty {
            return None;
        }
        let factor = self.pending_factor;
        self.pending_factor = 1.0;
        self.dirty = false;
        Some(factor)
    }

    pub fn end(&mut self) {
        self.active = false;
    }
}
