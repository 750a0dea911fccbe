use crate::error::{TimelineError, TimelineResult};

use super::TimelineConfig;

pub(super) fn validate_timeline_config(config: TimelineConfig) -> TimelineResult<TimelineConfig> {
    config.viewport.ensure_valid()?;
    config.scale_bounds.validate()?;
    config.layout_style.validate()?;
    config.overlap_behavior.validate()?;
    config.snap.validate()?;
    config.utc_offset()?;

    if !config.points_per_minute.is_finite() || config.points_per_minute <= 0.0 {
        return Err(TimelineError::InvalidConfig(
            "initial points per minute must be finite and > 0".to_owned(),
        ));
    }
    if !config.resize_handle_extent_px.is_finite() || config.resize_handle_extent_px < 0.0 {
        return Err(TimelineError::InvalidConfig(
            "resize handle extent must be finite and >= 0".to_owned(),
        ));
    }
    if !config.commit_animation_seconds.is_finite() || config.commit_animation_seconds < 0.0 {
        return Err(TimelineError::InvalidConfig(
            "commit animation seconds must be finite and >= 0".to_owned(),
        ));
    }
    if config.create_duration_minutes == 0 || config.create_duration_minutes > 24 * 60 {
        return Err(TimelineError::InvalidConfig(
            "create duration must be in 1..=1440 minutes".to_owned(),
        ));
    }

    Ok(config)
}

pub(super) fn validate_frame_delta_seconds(delta_seconds: f64) -> TimelineResult<f64> {
    if !delta_seconds.is_finite() || delta_seconds < 0.0 {
        return Err(TimelineError::InvalidData(
            "frame delta seconds must be finite and >= 0".to_owned(),
        ));
    }
    Ok(delta_seconds)
}

pub(super) fn validate_screen_offset(value: f64, name: &str) -> TimelineResult<f64> {
    if !value.is_finite() {
        return Err(TimelineError::InvalidData(format!("{name} must be finite")));
    }
    Ok(value)
}

/// Factor carried by one raw pinch sample, or `None` for a neutral sample.
pub(super) fn pinch_sample_factor(scale_delta: f64) -> TimelineResult<Option<f64>> {
    if !scale_delta.is_finite() || scale_delta <= 0.0 {
        return Err(TimelineError::InvalidData(format!(
            "pinch scale delta must be finite and > 0, got {scale_delta}"
        )));
    }
    Ok(((scale_delta - 1.0).abs() > f64::EPSILON).then_some(scale_delta))
}

#[cfg(test)]
mod tests {
    use super::{pinch_sample_factor, validate_frame_delta_seconds};

    #[test]
    fn neutral_pinch_sample_carries_no_factor() {
        assert_eq!(pinch_sample_factor(1.0).expect("neutral"), None);
        assert_eq!(pinch_sample_factor(0.8).expect("shrink"), Some(0.8));
    }

    #[test]
    fn degenerate_pinch_samples_are_errors() {
        for sample in [0.0, -2.0, f64::INFINITY, f64::NAN] {
            assert!(pinch_sample_factor(sample).is_err());
        }
    }

    #[test]
    fn negative_frame_delta_is_rejected() {
        assert!(validate_frame_delta_seconds(-0.1).is_err());
        assert_eq!(validate_frame_delta_seconds(0.0).expect("zero delta"), 0.0);
    }
}
