use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stable identity of an event across layout passes and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Time-bounded event in the configured wall-clock calendar.
///
/// `edited_event` is set only on working copies produced by an edit session;
/// committing the copy writes its interval back into the event with that id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub id: EventId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    #[serde(default)]
    pub edited_event: Option<EventId>,
}

impl TimedEvent {
    #[must_use]
    pub fn new(id: EventId, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id,
            start,
            end,
            is_all_day: false,
            title: String::new(),
            metadata: IndexMap::new(),
            edited_event: None,
        }
    }

    /// Builds an all-day event covering `day` from midnight to midnight.
    #[must_use]
    pub fn all_day(id: EventId, day: NaiveDate) -> Self {
        let start = day_start(day);
        Self {
            is_all_day: true,
            ..Self::new(id, start, start + TimeDelta::days(1))
        }
    }

    /// Converts UTC instants into wall-clock time at `offset`.
    #[must_use]
    pub fn from_utc(
        id: EventId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self::new(
            id,
            start.with_timezone(&offset).naive_local(),
            end.with_timezone(&offset).naive_local(),
        )
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        intervals_overlap((self.start, self.end), (other.start, other.end))
    }

    /// Returns `true` when the event covers any instant of `day`.
    #[must_use]
    pub fn intersects_day(&self, day: NaiveDate) -> bool {
        let day_start = day_start(day);
        intervals_overlap(
            (self.start, self.end),
            (day_start, day_start + TimeDelta::days(1)),
        )
    }

    #[must_use]
    pub fn is_working_copy(&self) -> bool {
        self.edited_event.is_some()
    }

    /// Produces the transient copy used by an edit session.
    #[must_use]
    pub fn working_copy(&self) -> Self {
        Self {
            edited_event: Some(self.id),
            ..self.clone()
        }
    }

    /// Writes a committed working copy's interval back into this event.
    ///
    /// Returns `false` when `committed` is not a working copy of `self`.
    pub fn apply_commit(&mut self, committed: &Self) -> bool {
        if committed.edited_event != Some(self.id) {
            return false;
        }
        self.start = committed.start;
        self.end = committed.end;
        true
    }

    /// Clamps a malformed interval (`end <= start`) to one minute.
    ///
    /// Returns `true` when the interval was changed.
    pub fn normalize_interval(&mut self) -> bool {
        if self.end > self.start {
            return false;
        }
        self.end = self.start + TimeDelta::minutes(1);
        true
    }
}

/// Strict interval intersection: touching endpoints do not overlap.
#[must_use]
pub fn intervals_overlap<T: PartialOrd>(a: (T, T), b: (T, T)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

#[must_use]
pub fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}
