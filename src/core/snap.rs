use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::event::day_start;
use crate::error::{TimelineError, TimelineResult};

/// Edit-time snapping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapConfiguration {
    /// Minute interval committed edges are rounded to.
    pub granularity_minutes: u32,
    /// Shortest duration an edited event may be resized to.
    pub minimum_event_duration_minutes: u32,
}

impl Default for SnapConfiguration {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            minimum_event_duration_minutes: 30,
        }
    }
}

impl SnapConfiguration {
    pub fn validate(self) -> TimelineResult<Self> {
        if self.granularity_minutes == 0 || self.granularity_minutes > 24 * 60 {
            return Err(TimelineError::InvalidConfig(
                "snap granularity must be in 1..=1440 minutes".to_owned(),
            ));
        }
        if self.minimum_event_duration_minutes == 0 {
            return Err(TimelineError::InvalidConfig(
                "minimum event duration must be > 0 minutes".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn minimum_event_duration(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minimum_event_duration_minutes))
    }

    /// Rounds `time` to the nearest multiple of the granularity.
    ///
    /// Ties round up; rounding past 23:59 lands on the next day's midnight.
    #[must_use]
    pub fn nearest(self, time: NaiveDateTime) -> NaiveDateTime {
        let step = i64::from(self.granularity_minutes.max(1)) * 60;
        let seconds = i64::from(time.num_seconds_from_midnight());
        let remainder = seconds % step;
        let floored = seconds - remainder;
        let rounded = if remainder * 2 >= step {
            floored + step
        } else {
            floored
        };
        day_start(time.date()) + TimeDelta::seconds(rounded)
    }
}
