use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{TimedEvent, Viewport};
use crate::interaction::{EditMode, InteractionMode};

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub viewport: Viewport,
    pub points_per_minute: f64,
    pub scroll_offset: f64,
    pub visible_day_count: usize,
    pub interaction_mode: InteractionMode,
    pub edit_mode: EditMode,
}

/// Notifications emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// Fired once per successful commit with the new interval applied.
    EventUpdated { event: TimedEvent, created: bool },
    ScaleChanged { points_per_minute: f64 },
    VisibleDaysChanged { days: Vec<NaiveDate> },
    DaysLaidOut { days: Vec<NaiveDate> },
    Rendered,
}

/// Subscriber interface for hosts that need commit callbacks or layout signals.
///
/// Observers are registered and removed explicitly by id.
pub trait TimelineObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &TimelineEvent, context: ObserverContext);
}
