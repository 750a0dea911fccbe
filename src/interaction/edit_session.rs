use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{EditHandle, LayoutFrame, SnapConfiguration, TimeCoordinateMapper, TimedEvent};

/// Phase of the single edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Creating,
    Dragging,
    ResizingTop,
    ResizingBottom,
}

impl EditMode {
    #[must_use]
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }

    fn from_handle(handle: EditHandle) -> Self {
        match handle {
            EditHandle::Body => Self::Dragging,
            EditHandle::Top => Self::ResizingTop,
            EditHandle::Bottom => Self::ResizingBottom,
        }
    }
}

/// Scale-dependent inputs for one edit step.
///
/// `day` is the day column currently under the working frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditGeometry {
    pub mapper: TimeCoordinateMapper,
    pub snap: SnapConfiguration,
    pub day: NaiveDate,
}

impl EditGeometry {
    fn minimum_height(self) -> f64 {
        f64::from(self.snap.minimum_event_duration_minutes) * self.mapper.points_per_minute()
    }

    fn snapped_time_at(self, y: f64) -> Option<NaiveDateTime> {
        self.mapper
            .y_to_time(y, self.day)
            .ok()
            .map(|time| self.snap.nearest(time))
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEdit {
    /// Working copy carrying the snapped interval.
    pub event: TimedEvent,
    pub day: NaiveDate,
    /// Working frame at release time, the start of the snap animation.
    pub released_frame: LayoutFrame,
    pub created: bool,
}

/// State machine for creating, dragging and resizing one event.
///
/// Pointer input moves the working frame only; times are derived from the
/// frame when the session commits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditSession {
    mode: EditMode,
    working: Option<TimedEvent>,
    created: bool,
    frame: LayoutFrame,
    last_pointer: Option<(f64, f64)>,
    accented_time: Option<NaiveDateTime>,
    moved: MovedEdges,
}

/// Edges of the working frame changed by pointer input during the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct MovedEdges {
    dragged: bool,
    top: bool,
    bottom: bool,
}

impl EditSession {
    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    #[must_use]
    pub fn working(&self) -> Option<&TimedEvent> {
        self.working.as_ref()
    }

    /// Working frame in timeline space; meaningless while idle.
    #[must_use]
    pub fn frame(&self) -> Option<LayoutFrame> {
        self.is_active().then_some(self.frame)
    }

    #[must_use]
    pub fn accented_time(&self) -> Option<NaiveDateTime> {
        self.accented_time
    }

    /// Starts a session on `working`. Rejected while another session is active.
    pub fn begin(&mut self, working: TimedEvent, frame: LayoutFrame, created: bool) -> bool {
        if self.is_active() {
            debug!(
                active = ?self.working.as_ref().map(|event| event.id),
                requested = ?working.id,
                "edit request rejected while another session is active"
            );
            return false;
        }
        debug!(id = ?working.id, created, "edit session started");
        self.mode = EditMode::Creating;
        self.accented_time = Some(working.start);
        self.working = Some(working);
        self.created = created;
        self.frame = frame;
        self.last_pointer = None;
        self.moved = MovedEdges::default();
        true
    }

    /// Grabs the working frame by `handle` at pointer `(x, y)`.
    pub fn pointer_down(&mut self, x: f64, y: f64, handle: EditHandle) -> bool {
        if !self.is_active() || !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.mode = EditMode::from_handle(handle);
        self.last_pointer = Some((x, y));
        true
    }

    /// Applies a pointer move. Returns `true` when the working frame changed.
    pub fn pointer_move(&mut self, x: f64, y: f64, geometry: EditGeometry) -> bool {
        if !self.is_active() || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some((last_x, last_y)) = self.last_pointer else {
            self.last_pointer = Some((x, y));
            return false;
        };
        if self.mode == EditMode::Creating {
            self.mode = EditMode::Dragging;
        }

        let (dx, dy) = (x - last_x, y - last_y);
        let mapper = geometry.mapper;
        let next = match self.mode {
            EditMode::Dragging => {
                let max_top = (mapper.day_bottom() - self.frame.height).max(mapper.day_top());
                let mut frame = self.frame.translated(dx, 0.0);
                frame.y = (self.frame.y + dy).clamp(mapper.day_top(), max_top);
                Some(frame)
            }
            EditMode::ResizingTop => {
                let bottom = self.frame.max_y();
                let top = (self.frame.y + dy).max(mapper.day_top());
                (bottom - top >= geometry.minimum_height()).then_some(LayoutFrame {
                    y: top,
                    height: bottom - top,
                    ..self.frame
                })
            }
            EditMode::ResizingBottom => {
                let bottom = (self.frame.max_y() + dy).min(mapper.day_bottom());
                (bottom - self.frame.y >= geometry.minimum_height()).then_some(LayoutFrame {
                    height: bottom - self.frame.y,
                    ..self.frame
                })
            }
            EditMode::Idle | EditMode::Creating => None,
        };

        // A rejected resize keeps the last accepted pointer so deltas accumulate.
        let Some(frame) = next else {
            return false;
        };
        match self.mode {
            EditMode::Dragging => self.moved.dragged = true,
            EditMode::ResizingTop => self.moved.top = true,
            EditMode::ResizingBottom => self.moved.bottom = true,
            EditMode::Idle | EditMode::Creating => {}
        }
        self.frame = frame;
        self.last_pointer = Some((x, y));
        self.accent(geometry);
        true
    }

    /// Replaces the working frame after a scale change.
    pub fn refresh_frame(&mut self, frame: LayoutFrame, geometry: EditGeometry) {
        if !self.is_active() {
            return;
        }
        self.frame = frame;
        self.accent(geometry);
    }

    fn accent(&mut self, geometry: EditGeometry) {
        let edge = match self.mode {
            EditMode::ResizingBottom => self.frame.max_y(),
            _ => self.frame.y,
        };
        if let Some(time) = geometry.snapped_time_at(edge) {
            self.accented_time = Some(time);
        }
    }

    /// Converts the working frame back into a snapped interval and ends the session.
    ///
    /// Every edge moved during the session is read back from the released
    /// frame, whichever grab moved it. A pure drag keeps the duration.
    /// Returns `None` when no session is active.
    pub fn commit(&mut self, geometry: EditGeometry) -> Option<CommittedEdit> {
        if !self.is_active() {
            return None;
        }
        let mode = self.mode;
        let moved = self.moved;
        let released_frame = self.frame;
        let created = self.created;
        let mut event = self.reset()?;

        let minimum = geometry.snap.minimum_event_duration();
        let duration = event.duration();
        let top_moved = moved.dragged || moved.top;
        let bottom_moved = moved.dragged || moved.bottom;
        if !top_moved && !bottom_moved {
            event.start = geometry.snap.nearest(event.start);
            event.end = geometry.snap.nearest(event.end).max(event.start + minimum);
        } else if moved.dragged && !moved.top && !moved.bottom {
            if let Some(start) = geometry.snapped_time_at(released_frame.y) {
                event.start = start;
                event.end = start + duration;
            }
        } else {
            if top_moved {
                if let Some(start) = geometry.snapped_time_at(released_frame.y) {
                    event.start = start;
                }
            }
            if bottom_moved {
                if let Some(end) = geometry.snapped_time_at(released_frame.max_y()) {
                    event.end = end;
                }
            }
            if bottom_moved {
                event.end = event.end.max(event.start + minimum);
            } else {
                event.start = event.start.min(event.end - minimum);
            }
        }

        debug!(
            id = ?event.id,
            ?mode,
            start = %event.start,
            end = %event.end,
            created,
            "edit session committed"
        );
        Some(CommittedEdit {
            event,
            day: geometry.day,
            released_frame,
            created,
        })
    }

    /// Discards the working copy without committing.
    pub fn cancel(&mut self) -> bool {
        match self.reset() {
            Some(event) => {
                debug!(id = ?event.id, "edit session cancelled");
                true
            }
            None => false,
        }
    }

    fn reset(&mut self) -> Option<TimedEvent> {
        self.mode = EditMode::Idle;
        self.created = false;
        self.last_pointer = None;
        self.accented_time = None;
        self.frame = LayoutFrame::default();
        self.moved = MovedEdges::default();
        self.working.take()
    }
}
