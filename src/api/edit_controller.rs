use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, trace};

use crate::core::{ColumnAssignment, EditHandle, EventId, LayoutFrame, TimedEvent};
use crate::extensions::TimelineEvent;
use crate::interaction::{EditGeometry, EditMode, SnapAnimation};
use crate::render::Renderer;

use super::TimelineEngine;
use super::timeline_model::EditOrigin;

impl<R: Renderer> TimelineEngine<R> {
    #[must_use]
    pub fn edit_mode(&self) -> EditMode {
        self.model.edit.mode()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.model.edit.is_active()
    }

    #[must_use]
    pub fn working_event(&self) -> Option<&TimedEvent> {
        self.model.edit.working()
    }

    /// Working frame in timeline space.
    #[must_use]
    pub fn working_frame(&self) -> Option<LayoutFrame> {
        self.model.edit.frame()
    }

    /// Snapped time under the edge being edited.
    #[must_use]
    pub fn accented_time(&self) -> Option<NaiveDateTime> {
        self.model.edit.accented_time()
    }

    #[must_use]
    pub fn snap_animation(&self) -> Option<SnapAnimation> {
        self.model.snap_animation
    }

    /// Starts creating a new event on `day` near `near`.
    ///
    /// The start snaps to the grid and the initial duration comes from the
    /// config. Rejected while another session is active or when `id` is taken.
    pub fn begin_create(&mut self, id: EventId, day: NaiveDate, near: NaiveDateTime) -> bool {
        if self.reject_while_editing(id) {
            return false;
        }
        if self.model.day_index(day).is_none() {
            debug!(%day, "create rejected for a day that is not visible");
            return false;
        }
        if self.event(id).is_some() {
            debug!(?id, "create rejected for an id that already exists");
            return false;
        }

        let minutes = i64::from(
            self.config
                .create_duration_minutes
                .max(self.model.snap.minimum_event_duration_minutes),
        );
        let start = self.model.snap.nearest(near);
        let event = TimedEvent::new(id, start, start + chrono::TimeDelta::minutes(minutes));
        self.start_session(event, day, ColumnAssignment::default(), true)
    }

    /// Starts editing an existing timed event from its laid-out position.
    pub fn begin_edit(&mut self, id: EventId) -> bool {
        if self.reject_while_editing(id) {
            return false;
        }
        self.relayout_if_needed();

        let Some((day, assignment)) = self.model.visible_days.iter().find_map(|day| {
            let layout = self.model.layouts.get(day)?;
            layout
                .assignments
                .get(&id)
                .map(|assignment| (*day, *assignment))
        }) else {
            debug!(?id, "edit rejected for an event without a visible timed frame");
            return false;
        };
        let Some(working) = self.event(id).map(TimedEvent::working_copy) else {
            return false;
        };
        self.start_session(working, day, assignment, false)
    }

    fn reject_while_editing(&self, requested: EventId) -> bool {
        if !self.model.edit.is_active() {
            return false;
        }
        debug!(
            active = ?self.model.edit.working().map(|event| event.id),
            ?requested,
            "edit request rejected while another session is active"
        );
        true
    }

    fn start_session(
        &mut self,
        working: TimedEvent,
        day: NaiveDate,
        assignment: ColumnAssignment,
        created: bool,
    ) -> bool {
        let Some(origin_x) = self.model.day_origin_x(day) else {
            return false;
        };
        let day_width = self.model.day_width();
        let frame = self
            .model
            .layout_engine
            .frame_for_interval(
                working.start,
                working.end,
                day,
                day_width,
                assignment,
                self.mapper(),
            )
            .translated(origin_x, 0.0);

        if let Some(animation) = self.model.snap_animation.take() {
            trace!(id = ?animation.event_id, "snap animation finished early");
        }

        if !self.model.edit.begin(working, frame, created) {
            return false;
        }
        self.model.edit_origin = Some(EditOrigin {
            day,
            assignment,
            origin_x,
            day_width,
        });
        true
    }

    /// Grabs the working frame at timeline-space `(x, y)`.
    ///
    /// The handle is resolved from the working frame's edges.
    pub fn edit_pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(frame) = self.model.edit.frame() else {
            return false;
        };
        let extent = self.config.resize_handle_extent_px.min(frame.height / 3.0);
        let handle = if (y - frame.y).abs() <= extent {
            EditHandle::Top
        } else if (frame.max_y() - y).abs() <= extent {
            EditHandle::Bottom
        } else {
            EditHandle::Body
        };
        self.edit_pointer_down_with_handle(x, y, handle)
    }

    /// Grabs the working frame with an explicit handle.
    pub fn edit_pointer_down_with_handle(&mut self, x: f64, y: f64, handle: EditHandle) -> bool {
        self.model.edit.pointer_down(x, y, handle)
    }

    /// Moves the pointer in timeline space. Returns `true` when the frame moved.
    pub fn edit_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(geometry) = self.edit_geometry() else {
            return false;
        };
        self.model.edit.pointer_move(x, y, geometry)
    }

    fn edit_geometry(&self) -> Option<EditGeometry> {
        let frame = self.model.edit.frame()?;
        self.edit_geometry_for(frame)
    }

    fn edit_geometry_for(&self, frame: LayoutFrame) -> Option<EditGeometry> {
        let day = self
            .model
            .day_at_x(frame.center_x())
            .or(self.model.edit_origin.map(|origin| origin.day))?;
        Some(EditGeometry {
            mapper: self.mapper(),
            snap: self.model.snap,
            day,
        })
    }

    /// Commits the working copy, writes it into the engine's event store and
    /// notifies observers once. Returns the updated event.
    pub fn commit_edit(&mut self) -> Option<TimedEvent> {
        let geometry = self.edit_geometry()?;
        let committed = self.model.edit.commit(geometry)?;
        self.model.edit_origin = None;

        let event = self.apply_committed_event(&committed.event);
        self.relayout_if_needed();

        self.model.snap_animation = None;
        if self.config.commit_animation_seconds > 0.0 {
            if let Some(target) = self.event_frame(committed.day, event.id) {
                self.model.snap_animation = Some(SnapAnimation::new(
                    event.id,
                    committed.day,
                    committed.released_frame,
                    target,
                    self.config.commit_animation_seconds,
                ));
            }
        }

        self.emit_timeline_event(TimelineEvent::EventUpdated {
            event: event.clone(),
            created: committed.created,
        });
        Some(event)
    }

    /// Discards the active session. No notification is sent.
    pub fn cancel_edit(&mut self) -> bool {
        self.model.edit_origin = None;
        self.model.edit.cancel()
    }

    /// Recomputes the working frame for the current scale and column geometry.
    ///
    /// The interval is unchanged. A horizontal drag offset is kept in units of
    /// day columns, so the frame stays over the same day.
    pub(super) fn refresh_working_frame(&mut self) {
        let Some(origin) = self.model.edit_origin else {
            return;
        };
        let (Some(current), Some((start, end))) = (
            self.model.edit.frame(),
            self.model.edit.working().map(|event| (event.start, event.end)),
        ) else {
            return;
        };
        let Some(origin_x) = self.model.day_origin_x(origin.day) else {
            return;
        };
        let layout_engine = self.model.layout_engine;
        let day_width = self.model.day_width();

        let (previous_slot_x, _) =
            layout_engine.horizontal_extent(origin.day_width, origin.assignment);
        let drag_columns = if origin.day_width > 0.0 {
            (current.x - origin.origin_x - previous_slot_x) / origin.day_width
        } else {
            0.0
        };
        let (slot_x, width) = layout_engine.horizontal_extent(day_width, origin.assignment);
        let (y, height) = layout_engine.vertical_extent(start, end, origin.day, self.mapper());
        let frame = LayoutFrame::new(
            origin_x + slot_x + drag_columns * day_width,
            y,
            width,
            height,
        );

        self.model.edit_origin = Some(EditOrigin {
            origin_x,
            day_width,
            ..origin
        });
        let Some(geometry) = self.edit_geometry_for(frame) else {
            return;
        };
        self.model.edit.refresh_frame(frame, geometry);
    }
}
