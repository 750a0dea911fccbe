pub mod event;
pub mod layout;
pub mod overlap;
pub mod scale;
pub mod snap;
pub mod time_mapper;
pub mod types;

pub use event::{EventId, TimedEvent, day_start, intervals_overlap};
pub use layout::{DayLayout, EditHandle, EventHit, LayoutEngine, LayoutStyle};
pub use overlap::{
    ColumnAssignment, OverlapBehavior, OverlapGroup, OverlapPolicy, OverlapResolution,
    OverlapResolver, TimeInterval,
};
pub use scale::{MINUTES_PER_DAY, MINUTES_PER_HOUR, ScaleBounds, ScaleState};
pub use snap::SnapConfiguration;
pub use time_mapper::TimeCoordinateMapper;
pub use types::{LayoutFrame, Viewport};
