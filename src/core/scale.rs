use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

pub const MINUTES_PER_HOUR: f64 = 60.0;
pub const MINUTES_PER_DAY: f64 = 24.0 * MINUTES_PER_HOUR;

/// Configured zoom limits in points per minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min_points_per_minute: f64,
    pub max_points_per_minute: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min_points_per_minute: 0.5,
            max_points_per_minute: 6.0,
        }
    }
}

impl ScaleBounds {
    pub fn validate(self) -> TimelineResult<Self> {
        if !self.min_points_per_minute.is_finite() || self.min_points_per_minute <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "min points per minute must be finite and > 0".to_owned(),
            ));
        }
        if !self.max_points_per_minute.is_finite()
            || self.max_points_per_minute < self.min_points_per_minute
        {
            return Err(TimelineError::InvalidConfig(
                "max points per minute must be finite and >= min".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Current vertical time scale.
///
/// `points_per_minute` always lies in `[effective_min, max]` where the effective
/// minimum also honours the floor that keeps a whole day at least as tall as
/// the visible container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    points_per_minute: f64,
    bounds: ScaleBounds,
    container_floor: Option<f64>,
}

impl ScaleState {
    pub fn new(points_per_minute: f64, bounds: ScaleBounds) -> TimelineResult<Self> {
        let bounds = bounds.validate()?;
        if !points_per_minute.is_finite() || points_per_minute <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "initial points per minute must be finite and > 0".to_owned(),
            ));
        }
        let mut state = Self {
            points_per_minute,
            bounds,
            container_floor: None,
        };
        state.points_per_minute = state.clamp(points_per_minute);
        Ok(state)
    }

    #[must_use]
    pub fn points_per_minute(self) -> f64 {
        self.points_per_minute
    }

    /// Pixels covered by one hour.
    #[must_use]
    pub fn vertical_diff(self) -> f64 {
        self.points_per_minute * MINUTES_PER_HOUR
    }

    #[must_use]
    pub fn bounds(self) -> ScaleBounds {
        self.bounds
    }

    #[must_use]
    pub fn container_floor(self) -> Option<f64> {
        self.container_floor
    }

    #[must_use]
    pub fn effective_min(self) -> f64 {
        let floor = self.container_floor.unwrap_or(0.0);
        self.bounds
            .min_points_per_minute
            .max(floor)
            .min(self.bounds.max_points_per_minute)
    }

    #[must_use]
    pub fn clamp(self, points_per_minute: f64) -> f64 {
        points_per_minute.clamp(self.effective_min(), self.bounds.max_points_per_minute)
    }

    /// Sets the scale, clamping out-of-range requests.
    ///
    /// Non-finite requests are ignored. Returns `true` when the scale changed.
    pub fn set_points_per_minute(&mut self, points_per_minute: f64) -> bool {
        if !points_per_minute.is_finite() {
            return false;
        }
        let next = self.clamp(points_per_minute);
        let changed = (next - self.points_per_minute).abs() > f64::EPSILON;
        self.points_per_minute = next;
        changed
    }

    /// Multiplies the scale by `factor`, then clamps.
    pub fn apply_factor(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.set_points_per_minute(self.points_per_minute * factor)
    }

    pub fn set_bounds(&mut self, bounds: ScaleBounds) -> TimelineResult<bool> {
        self.bounds = bounds.validate()?;
        let current = self.points_per_minute;
        Ok(self.set_points_per_minute(current))
    }

    /// Recomputes the container floor from the visible height.
    ///
    /// Returns `true` when the scale had to grow to honour the new floor.
    pub fn set_container_height(&mut self, container_height: f64, vertical_inset: f64) -> bool {
        let usable = container_height - 2.0 * vertical_inset;
        self.container_floor =
            (usable.is_finite() && usable > 0.0).then(|| usable / MINUTES_PER_DAY);
        let current = self.points_per_minute;
        self.set_points_per_minute(current)
    }

    /// Total content height of one day including top and bottom insets.
    #[must_use]
    pub fn content_height(self, vertical_inset: f64) -> f64 {
        2.0 * vertical_inset + MINUTES_PER_DAY * self.points_per_minute
    }
}
