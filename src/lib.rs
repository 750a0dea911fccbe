//! timeline-rs: day-timeline layout engine.
//!
//! Maps wall-clock time to vertical offsets, packs overlapping events into
//! columns, drives create/drag/resize edit sessions and pinch zoom, and hands
//! backend-agnostic frames to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FrameTickOutcome, TimelineConfig, TimelineEngine, TimelineHit, TimelineSnapshot};
pub use error::{TimelineError, TimelineResult};
