use chrono::NaiveDate;
use indexmap::IndexSet;

use crate::extensions::TimelineObserver;

/// Days whose layout must be recomputed before the next frame.
#[derive(Debug, Default)]
pub(super) struct PendingLayout {
    all: bool,
    days: IndexSet<NaiveDate>,
}

impl PendingLayout {
    pub(super) fn mark_all(&mut self) {
        self.all = true;
    }

    pub(super) fn mark_day(&mut self, day: NaiveDate) {
        self.days.insert(day);
    }

    #[must_use]
    pub(super) fn is_empty(&self) -> bool {
        !self.all && self.days.is_empty()
    }

    /// Drains the pending set, expanded against the currently visible days.
    pub(super) fn take(&mut self, visible_days: &[NaiveDate]) -> Vec<NaiveDate> {
        let all = std::mem::take(&mut self.all);
        let days = std::mem::take(&mut self.days);
        visible_days
            .iter()
            .copied()
            .filter(|day| all || days.contains(day))
            .collect()
    }
}

/// Runtime orchestration state grouped separately from the domain model.
pub(super) struct TimelineRuntimeState {
    pub(super) observers: Vec<Box<dyn TimelineObserver>>,
    pub(super) pending_layout: PendingLayout,
    pub(super) layout_pass_count: u64,
    pub(super) zoom_flush_count: u64,
}

impl TimelineRuntimeState {
    #[must_use]
    pub(super) fn with_full_invalidation() -> Self {
        let mut pending_layout = PendingLayout::default();
        pending_layout.mark_all();
        Self {
            observers: Vec::new(),
            pending_layout,
            layout_pass_count: 0,
            zoom_flush_count: 0,
        }
    }
}
