mod frame;
mod null_renderer;

pub use frame::{DayColumn, RenderFrame, WorkingFrame};
pub use null_renderer::NullRenderer;

use crate::error::TimelineResult;

/// Contract implemented by the host's frame consumer.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from layout and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()>;
}
