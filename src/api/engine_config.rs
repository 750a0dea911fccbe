use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::core::{LayoutStyle, OverlapBehavior, ScaleBounds, SnapConfiguration, Viewport};
use crate::error::{TimelineError, TimelineResult};

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load timeline setup without
/// inventing their own ad-hoc format. Values are immutable once the engine is
/// built; layout passes receive them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub viewport: Viewport,
    #[serde(default = "default_points_per_minute")]
    pub points_per_minute: f64,
    #[serde(default)]
    pub scale_bounds: ScaleBounds,
    #[serde(default)]
    pub layout_style: LayoutStyle,
    #[serde(default)]
    pub overlap_behavior: OverlapBehavior,
    #[serde(default)]
    pub snap: SnapConfiguration,
    /// Height of the top/bottom grab regions of an event frame.
    #[serde(default = "default_resize_handle_extent_px")]
    pub resize_handle_extent_px: f64,
    /// Duration of the post-commit snap animation; `0` disables it.
    #[serde(default = "default_commit_animation_seconds")]
    pub commit_animation_seconds: f64,
    /// Initial duration of events created from an empty slot.
    #[serde(default = "default_create_duration_minutes")]
    pub create_duration_minutes: u32,
    /// Offset of the single wall-clock calendar all events are expressed in.
    #[serde(default)]
    pub utc_offset_seconds: i32,
}

impl TimelineConfig {
    /// Creates a config with default layout, scale and snap parameters.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            points_per_minute: default_points_per_minute(),
            scale_bounds: ScaleBounds::default(),
            layout_style: LayoutStyle::default(),
            overlap_behavior: OverlapBehavior::default(),
            snap: SnapConfiguration::default(),
            resize_handle_extent_px: default_resize_handle_extent_px(),
            commit_animation_seconds: default_commit_animation_seconds(),
            create_duration_minutes: default_create_duration_minutes(),
            utc_offset_seconds: 0,
        }
    }

    /// Sets the initial scale.
    #[must_use]
    pub fn with_points_per_minute(mut self, points_per_minute: f64) -> Self {
        self.points_per_minute = points_per_minute;
        self
    }

    #[must_use]
    pub fn with_scale_bounds(
        mut self,
        min_points_per_minute: f64,
        max_points_per_minute: f64,
    ) -> Self {
        self.scale_bounds = ScaleBounds {
            min_points_per_minute,
            max_points_per_minute,
        };
        self
    }

    #[must_use]
    pub fn with_layout_style(mut self, style: LayoutStyle) -> Self {
        self.layout_style = style;
        self
    }

    /// Switches between compact packing and bucket splitting.
    #[must_use]
    pub fn with_overlap_behavior(mut self, behavior: OverlapBehavior) -> Self {
        self.overlap_behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_snap(mut self, snap: SnapConfiguration) -> Self {
        self.snap = snap;
        self
    }

    #[must_use]
    pub fn with_resize_handle_extent_px(mut self, extent: f64) -> Self {
        self.resize_handle_extent_px = extent;
        self
    }

    #[must_use]
    pub fn with_commit_animation_seconds(mut self, seconds: f64) -> Self {
        self.commit_animation_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_create_duration_minutes(mut self, minutes: u32) -> Self {
        self.create_duration_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }

    pub fn utc_offset(self) -> TimelineResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            TimelineError::InvalidConfig(format!(
                "utc offset {} seconds is out of range",
                self.utc_offset_seconds
            ))
        })
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> TimelineResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            TimelineError::InvalidConfig(format!("failed to serialize timeline config: {e}"))
        })
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidConfig(format!("failed to parse timeline config: {e}"))
        })
    }
}

fn default_points_per_minute() -> f64 {
    1.0
}

fn default_resize_handle_extent_px() -> f64 {
    10.0
}

fn default_commit_animation_seconds() -> f64 {
    0.2
}

fn default_create_duration_minutes() -> u32 {
    60
}

#[cfg(test)]
mod tests {
    use super::TimelineConfig;
    use crate::core::Viewport;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = TimelineConfig::from_json_str(r#"{"viewport":{"width":700,"height":900}}"#)
            .expect("parse");
        assert_eq!(config, TimelineConfig::new(Viewport::new(700, 900)));
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let config = TimelineConfig::new(Viewport::new(400, 600))
            .with_points_per_minute(2.5)
            .with_utc_offset_seconds(3_600);
        let json = config.to_json_pretty().expect("serialize");
        assert_eq!(TimelineConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let config = TimelineConfig::new(Viewport::new(400, 600)).with_utc_offset_seconds(90_000);
        assert!(config.utc_offset().is_err());
    }
}
