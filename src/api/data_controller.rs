use chrono::NaiveDate;
use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::core::{EventId, TimedEvent};
use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    #[must_use]
    pub fn visible_days(&self) -> &[NaiveDate] {
        &self.model.visible_days
    }

    /// Replaces the days shown side by side.
    ///
    /// An edit session whose day scrolls out of view is cancelled.
    pub fn set_visible_days(&mut self, days: Vec<NaiveDate>) -> TimelineResult<()> {
        if days.is_empty() {
            return Err(TimelineError::InvalidData(
                "at least one visible day is required".to_owned(),
            ));
        }
        let unique: IndexSet<NaiveDate> = days.iter().copied().collect();
        if unique.len() != days.len() {
            return Err(TimelineError::InvalidData(
                "visible days must be unique".to_owned(),
            ));
        }
        if days == self.model.visible_days {
            return Ok(());
        }

        if let Some(origin) = self.model.edit_origin {
            if !unique.contains(&origin.day) {
                self.cancel_edit();
            }
        }
        self.model.snap_animation = None;
        self.model.visible_days = days;
        self.model.layouts.retain(|day, _| unique.contains(day));
        self.runtime.pending_layout.mark_all();
        self.refresh_working_frame();
        self.emit_timeline_event(TimelineEvent::VisibleDaysChanged {
            days: self.model.visible_days.clone(),
        });
        Ok(())
    }

    /// Shows a single day.
    pub fn set_displayed_day(&mut self, day: NaiveDate) -> TimelineResult<()> {
        self.set_visible_days(vec![day])
    }

    /// Stores the provider's events for `day`.
    ///
    /// The engine keeps its own copy; malformed intervals are clamped to one
    /// minute. Returns the number of events that had to be clamped.
    pub fn set_day_events(&mut self, day: NaiveDate, mut events: Vec<TimedEvent>) -> usize {
        let mut normalized = 0;
        for event in &mut events {
            if event.normalize_interval() {
                warn!(
                    id = ?event.id,
                    start = %event.start,
                    "event end was not after start; clamped to one minute"
                );
                normalized += 1;
            }
        }
        debug!(%day, count = events.len(), normalized, "day events replaced");
        self.model.events.insert(day, events);
        self.runtime.pending_layout.mark_day(day);
        normalized
    }

    /// Drops the stored events of `day`. Returns `true` when something was removed.
    pub fn clear_day_events(&mut self, day: NaiveDate) -> bool {
        let removed = self.model.events.shift_remove(&day).is_some();
        if removed {
            self.runtime.pending_layout.mark_day(day);
        }
        removed
    }

    #[must_use]
    pub fn day_events(&self, day: NaiveDate) -> &[TimedEvent] {
        self.model
            .events
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&TimedEvent> {
        self.model
            .events
            .values()
            .flat_map(|events| events.iter())
            .find(|event| event.id == id)
    }

    /// Writes a committed working copy into every stored instance and moves
    /// the event between day lists when its interval changed days.
    pub(super) fn apply_committed_event(&mut self, committed: &TimedEvent) -> TimedEvent {
        let mut canonical = committed.clone();
        canonical.edited_event = None;

        let days: IndexSet<NaiveDate> = self
            .model
            .events
            .keys()
            .chain(self.model.visible_days.iter())
            .copied()
            .collect();
        for day in days {
            let events = self.model.events.entry(day).or_default();
            let before = events.len();
            let mut changed = false;
            for instance in events.iter_mut().filter(|event| event.id == canonical.id) {
                changed |= instance.apply_commit(committed);
            }
            events.retain(|event| event.id != canonical.id || event.intersects_day(day));
            let present = events.iter().any(|event| event.id == canonical.id);
            if !present && canonical.intersects_day(day) {
                events.push(canonical.clone());
                changed = true;
            }
            if changed || events.len() != before {
                self.runtime.pending_layout.mark_day(day);
            }
        }

        canonical
    }
}
