use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Visible container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub(crate) fn ensure_valid(self) -> TimelineResult<Self> {
        if !self.is_valid() {
            return Err(TimelineError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Computed rectangle of one event inside a day's coordinate space.
///
/// Frames are produced by the layout pass and fully replaced on the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutFrame {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn max_x(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Linear interpolation between two frames, `progress` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, target: Self, progress: f64) -> Self {
        let t = progress.clamp(0.0, 1.0);
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            width: self.width + (target.width - self.width) * t,
            height: self.height + (target.height - self.height) * t,
        }
    }

    pub fn validate(self) -> TimelineResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(TimelineError::InvalidData(
                "layout frame components must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(TimelineError::InvalidData(
                "layout frame size must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}
