use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::core::event::day_start;
use crate::core::scale::{MINUTES_PER_DAY, MINUTES_PER_HOUR, ScaleState};
use crate::error::{TimelineError, TimelineResult};

/// Absorbs float noise so exact minute offsets never truncate to the previous minute.
const MINUTE_EPSILON: f64 = 1e-6;

/// Converts between wall-clock time and vertical offsets for one displayed day.
///
/// Offsets are measured in the day's content space: `vertical_inset` marks
/// midnight at the top and `vertical_inset + 24 * vertical_diff` midnight at
/// the bottom. Times on the previous/next calendar day map above/below that
/// range; callers that render a single day clamp with [`Self::clamped_time_to_y`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeCoordinateMapper {
    vertical_inset: f64,
    points_per_minute: f64,
}

impl TimeCoordinateMapper {
    #[must_use]
    pub fn new(vertical_inset: f64, scale: ScaleState) -> Self {
        Self {
            vertical_inset,
            points_per_minute: scale.points_per_minute(),
        }
    }

    pub fn with_points_per_minute(
        vertical_inset: f64,
        points_per_minute: f64,
    ) -> TimelineResult<Self> {
        if !vertical_inset.is_finite() || vertical_inset < 0.0 {
            return Err(TimelineError::InvalidData(
                "vertical inset must be finite and >= 0".to_owned(),
            ));
        }
        if !points_per_minute.is_finite() || points_per_minute <= 0.0 {
            return Err(TimelineError::InvalidData(
                "points per minute must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            vertical_inset,
            points_per_minute,
        })
    }

    #[must_use]
    pub fn points_per_minute(self) -> f64 {
        self.points_per_minute
    }

    #[must_use]
    pub fn vertical_inset(self) -> f64 {
        self.vertical_inset
    }

    /// Pixels covered by one hour.
    #[must_use]
    pub fn vertical_diff(self) -> f64 {
        self.points_per_minute * MINUTES_PER_HOUR
    }

    /// Offset of the displayed day's leading midnight.
    #[must_use]
    pub fn day_top(self) -> f64 {
        self.vertical_inset
    }

    /// Offset of the displayed day's trailing midnight.
    #[must_use]
    pub fn day_bottom(self) -> f64 {
        self.vertical_inset + MINUTES_PER_DAY * self.points_per_minute
    }

    /// Calendar-day distance of `time` relative to `day`, limited to `-1..=1`.
    #[must_use]
    pub fn day_offset(time: NaiveDateTime, day: NaiveDate) -> i64 {
        (time.date() - day).num_days().clamp(-1, 1)
    }

    #[must_use]
    pub fn time_to_y(self, time: NaiveDateTime, day: NaiveDate) -> f64 {
        let vertical_diff = self.vertical_diff();
        let day_offset = Self::day_offset(time, day) as f64;
        self.vertical_inset
            + f64::from(time.hour()) * vertical_diff
            + f64::from(time.minute()) * vertical_diff / MINUTES_PER_HOUR
            + day_offset * 24.0 * vertical_diff
    }

    /// Same as [`Self::time_to_y`] but pinned to the displayed day's edges.
    #[must_use]
    pub fn clamped_time_to_y(self, time: NaiveDateTime, day: NaiveDate) -> f64 {
        self.time_to_y(time, day)
            .clamp(self.day_top(), self.day_bottom())
    }

    /// Continuous minutes since the displayed day's midnight at offset `y`.
    #[must_use]
    pub fn y_to_minutes(self, y: f64) -> f64 {
        (y - self.vertical_inset) / self.points_per_minute
    }

    #[must_use]
    pub fn minutes_to_y(self, minutes: f64) -> f64 {
        self.vertical_inset + minutes * self.points_per_minute
    }

    /// Inverse of [`Self::time_to_y`], truncated to minute resolution.
    ///
    /// Offsets beyond the neighbouring days are limited to the previous day's
    /// midnight and the next day's last minute.
    pub fn y_to_time(self, y: f64, day: NaiveDate) -> TimelineResult<NaiveDateTime> {
        if !y.is_finite() {
            return Err(TimelineError::InvalidData(
                "vertical offset must be finite".to_owned(),
            ));
        }

        let total_minutes = (self.y_to_minutes(y) + MINUTE_EPSILON)
            .floor()
            .clamp(-MINUTES_PER_DAY, 2.0 * MINUTES_PER_DAY - 1.0) as i64;
        let minutes_per_day = MINUTES_PER_DAY as i64;
        let day_offset = total_minutes.div_euclid(minutes_per_day);
        let minute_of_day = total_minutes.rem_euclid(minutes_per_day);
        let hour = minute_of_day / 60;
        let minute = (minute_of_day % 60).clamp(0, 59);

        Ok(day_start(day)
            + TimeDelta::days(day_offset)
            + TimeDelta::hours(hour)
            + TimeDelta::minutes(minute))
    }
}
