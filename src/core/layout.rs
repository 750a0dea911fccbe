use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::event::{EventId, TimedEvent, day_start};
use crate::core::overlap::{ColumnAssignment, OverlapPolicy, OverlapResolver, TimeInterval};
use crate::core::scale::{MINUTES_PER_HOUR, ScaleState};
use crate::core::time_mapper::TimeCoordinateMapper;
use crate::core::types::LayoutFrame;
use crate::error::{TimelineError, TimelineResult};

/// Numeric layout parameters supplied by the host's styling layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutStyle {
    /// Space above midnight and below the next midnight.
    pub vertical_inset: f64,
    /// Space reserved at the leading edge of each day column.
    pub leading_inset: f64,
    /// Horizontal gap trimmed from every event slot.
    pub event_gap: f64,
    /// Smallest rendered event height as a fraction of one hour.
    pub minimum_visual_duration_ratio: f64,
    pub all_day_row_height: f64,
    /// Cap on the all-day band; overflowing rows scroll inside the band.
    pub all_day_max_height: f64,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            vertical_inset: 8.0,
            leading_inset: 0.0,
            event_gap: 1.0,
            minimum_visual_duration_ratio: 0.2,
            all_day_row_height: 24.0,
            all_day_max_height: 72.0,
        }
    }
}

impl LayoutStyle {
    pub fn validate(self) -> TimelineResult<Self> {
        let non_negative = [
            ("vertical inset", self.vertical_inset),
            ("leading inset", self.leading_inset),
            ("event gap", self.event_gap),
            ("all-day row height", self.all_day_row_height),
            ("all-day max height", self.all_day_max_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.minimum_visual_duration_ratio.is_finite()
            || !(0.0..=1.0).contains(&self.minimum_visual_duration_ratio)
        {
            return Err(TimelineError::InvalidConfig(
                "minimum visual duration ratio must be in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Duration every timed event is stretched to at least, for layout only.
    #[must_use]
    pub fn minimum_visual_duration(self) -> TimeDelta {
        let seconds = (self.minimum_visual_duration_ratio * MINUTES_PER_HOUR * 60.0).ceil();
        TimeDelta::seconds(seconds as i64)
    }
}

/// Grab region of an event frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditHandle {
    Body,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventHit {
    pub id: EventId,
    pub handle: EditHandle,
    pub frame: LayoutFrame,
}

/// Output of one layout pass for one day.
///
/// Frames are in the day's own coordinate space: `x = 0` is the day column's
/// leading edge, `y = 0` the top of the scrollable content. All-day frames are
/// relative to the all-day band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub day: NaiveDate,
    pub width: f64,
    pub content_height: f64,
    pub timed_frames: IndexMap<EventId, LayoutFrame>,
    pub assignments: IndexMap<EventId, ColumnAssignment>,
    pub all_day_frames: IndexMap<EventId, LayoutFrame>,
    pub all_day_band_height: f64,
    pub all_day_content_height: f64,
}

impl DayLayout {
    #[must_use]
    pub fn frame(&self, id: EventId) -> Option<LayoutFrame> {
        self.timed_frames
            .get(&id)
            .or_else(|| self.all_day_frames.get(&id))
            .copied()
    }

    /// Resolves the timed event and grab region under a day-space point.
    ///
    /// When floors make frames touch, the frame whose centre is closest wins.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64, handle_extent: f64) -> Option<EventHit> {
        self.timed_frames
            .iter()
            .filter(|(_, frame)| frame.contains(x, y))
            .min_by_key(|(_, frame)| {
                let dx = frame.center_x() - x;
                let dy = (frame.y + frame.height / 2.0) - y;
                OrderedFloat(dx * dx + dy * dy)
            })
            .map(|(id, frame)| {
                let extent = handle_extent.max(0.0).min(frame.height / 3.0);
                let handle = if y - frame.y <= extent {
                    EditHandle::Top
                } else if frame.max_y() - y <= extent {
                    EditHandle::Bottom
                } else {
                    EditHandle::Body
                };
                EventHit {
                    id: *id,
                    handle,
                    frame: *frame,
                }
            })
    }
}

/// Per-day layout orchestration over the resolver and the time mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    style: LayoutStyle,
    resolver: OverlapResolver,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(style: LayoutStyle, policy: OverlapPolicy) -> Self {
        Self {
            style,
            resolver: OverlapResolver::new(policy),
        }
    }

    #[must_use]
    pub fn style(self) -> LayoutStyle {
        self.style
    }

    #[must_use]
    pub fn mapper(self, scale: ScaleState) -> TimeCoordinateMapper {
        TimeCoordinateMapper::new(self.style.vertical_inset, scale)
    }

    /// Width available to event columns inside a day of `day_width`.
    #[must_use]
    pub fn usable_width(self, day_width: f64) -> f64 {
        (day_width - self.style.leading_inset).max(0.0)
    }

    /// Interval used for grouping on `day`.
    ///
    /// Matches the rendered extent: clipped to the day and stretched by the
    /// minimum visual duration, shifted up when the floor would cross midnight.
    #[must_use]
    pub fn layout_interval(
        self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        day: NaiveDate,
    ) -> TimeInterval {
        let minimum = self.style.minimum_visual_duration();
        let day_begin = day_start(day);
        let next_midnight = day_begin + TimeDelta::days(1);
        let start = start.max(day_begin).min(next_midnight - minimum);
        let end = end.min(next_midnight).max(start + minimum);
        TimeInterval::new(start, end)
    }

    /// Horizontal extent `(x, width)` of a slot inside a day of `day_width`.
    #[must_use]
    pub fn horizontal_extent(self, day_width: f64, assignment: ColumnAssignment) -> (f64, f64) {
        let (slot_x, slot_width) = assignment.slot(self.usable_width(day_width));
        (
            self.style.leading_inset + slot_x,
            (slot_width - self.style.event_gap).max(0.0),
        )
    }

    /// Vertical extent `(y, height)` of an interval, clamped to the day and floored.
    #[must_use]
    pub fn vertical_extent(
        self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        day: NaiveDate,
        mapper: TimeCoordinateMapper,
    ) -> (f64, f64) {
        let floor = self.style.minimum_visual_duration_ratio * mapper.vertical_diff();
        let mut top = mapper.clamped_time_to_y(start, day);
        let bottom = mapper.clamped_time_to_y(end, day);
        let mut height = bottom - top;
        if height < floor {
            height = floor;
            if top + height > mapper.day_bottom() {
                top = (mapper.day_bottom() - height).max(mapper.day_top());
            }
        }
        (top, height)
    }

    /// Frame of one timed interval inside the given slot.
    #[must_use]
    pub fn frame_for_interval(
        self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        day: NaiveDate,
        day_width: f64,
        assignment: ColumnAssignment,
        mapper: TimeCoordinateMapper,
    ) -> LayoutFrame {
        let (x, width) = self.horizontal_extent(day_width, assignment);
        let (y, height) = self.vertical_extent(start, end, day, mapper);
        LayoutFrame::new(x, y, width, height)
    }

    /// Lays out one day. Pure: identical inputs yield identical frames.
    #[must_use]
    pub fn layout_day(
        self,
        events: &[TimedEvent],
        day: NaiveDate,
        day_width: f64,
        scale: ScaleState,
    ) -> DayLayout {
        let mapper = self.mapper(scale);
        let mut timed: Vec<&TimedEvent> = Vec::new();
        let mut all_day: Vec<&TimedEvent> = Vec::new();
        for event in events.iter().filter(|event| event.intersects_day(day)) {
            if event.is_all_day {
                all_day.push(event);
            } else {
                timed.push(event);
            }
        }
        timed.sort_by_key(|event| event.start);
        all_day.sort_by_key(|event| event.start);
        // Floors shifted above midnight can move an event ahead of earlier starts.
        timed.sort_by_key(|event| self.layout_interval(event.start, event.end, day).start);

        let intervals: Vec<TimeInterval> = timed
            .iter()
            .map(|event| self.layout_interval(event.start, event.end, day))
            .collect();
        let resolution = self.resolver.resolve(&intervals);

        let mut timed_frames = IndexMap::with_capacity(timed.len());
        let mut assignments = IndexMap::with_capacity(timed.len());
        for (event, assignment) in timed.iter().zip(resolution.assignments.iter().copied()) {
            let frame =
                self.frame_for_interval(event.start, event.end, day, day_width, assignment, mapper);
            timed_frames.insert(event.id, frame);
            assignments.insert(event.id, assignment);
        }

        let row_height = self.style.all_day_row_height;
        let usable_width = self.usable_width(day_width);
        let all_day_frames: IndexMap<EventId, LayoutFrame> = all_day
            .iter()
            .enumerate()
            .map(|(row, event)| {
                let frame = LayoutFrame::new(
                    self.style.leading_inset,
                    row as f64 * row_height,
                    usable_width,
                    (row_height - self.style.event_gap).max(0.0),
                );
                (event.id, frame)
            })
            .collect();
        let all_day_content_height = all_day_frames.len() as f64 * row_height;

        trace!(
            %day,
            timed = timed_frames.len(),
            all_day = all_day_frames.len(),
            groups = resolution.groups.len(),
            points_per_minute = scale.points_per_minute(),
            "day layout pass"
        );

        DayLayout {
            day,
            width: day_width,
            content_height: scale.content_height(self.style.vertical_inset),
            timed_frames,
            assignments,
            all_day_frames,
            all_day_band_height: all_day_content_height.min(self.style.all_day_max_height),
            all_day_content_height,
        }
    }
}
