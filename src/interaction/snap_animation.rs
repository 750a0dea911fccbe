use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{EventId, LayoutFrame};

/// Frame animation from the released working frame to its snapped position.
///
/// Stepped by the host's frame ticks. A new edit session finishes it early.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapAnimation {
    pub event_id: EventId,
    pub day: NaiveDate,
    from: LayoutFrame,
    to: LayoutFrame,
    elapsed_seconds: f64,
    duration_seconds: f64,
}

impl SnapAnimation {
    #[must_use]
    pub fn new(
        event_id: EventId,
        day: NaiveDate,
        from: LayoutFrame,
        to: LayoutFrame,
        duration_seconds: f64,
    ) -> Self {
        Self {
            event_id,
            day,
            from,
            to,
            elapsed_seconds: 0.0,
            duration_seconds: duration_seconds.max(0.0),
        }
    }

    #[must_use]
    pub fn progress(self) -> f64 {
        if self.duration_seconds <= 0.0 {
            return 1.0;
        }
        (self.elapsed_seconds / self.duration_seconds).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.progress() >= 1.0
    }

    #[must_use]
    pub fn frame(self) -> LayoutFrame {
        self.from.lerp(self.to, self.progress())
    }

    #[must_use]
    pub fn target(self) -> LayoutFrame {
        self.to
    }

    /// Advances the animation. Returns `true` while it is still running.
    pub fn step(&mut self, delta_seconds: f64) -> bool {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.elapsed_seconds += delta_seconds;
        }
        !self.is_finished()
    }

    /// Jumps to the final frame.
    pub fn finish(&mut self) {
        self.elapsed_seconds = self.duration_seconds;
    }
}
