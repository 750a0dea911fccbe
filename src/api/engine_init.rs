use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::core::{LayoutEngine, ScaleState};
use crate::error::TimelineResult;
use crate::interaction::{EditSession, PinchZoomState};
use crate::render::Renderer;

use super::{
    TimelineConfig, TimelineEngine, timeline_model::TimelineModel,
    timeline_runtime::TimelineRuntimeState, validation::validate_timeline_config,
};

impl<R: Renderer> TimelineEngine<R> {
    /// Creates a fully initialized engine showing `displayed_day`.
    pub fn new(
        renderer: R,
        config: TimelineConfig,
        displayed_day: NaiveDate,
    ) -> TimelineResult<Self> {
        let config = validate_timeline_config(config)?;

        let mut scale = ScaleState::new(config.points_per_minute, config.scale_bounds)?;
        scale.set_container_height(
            f64::from(config.viewport.height),
            config.layout_style.vertical_inset,
        );
        let layout_engine =
            LayoutEngine::new(config.layout_style, config.overlap_behavior.policy());

        debug!(
            %displayed_day,
            points_per_minute = scale.points_per_minute(),
            policy = ?config.overlap_behavior.policy(),
            "timeline engine initialized"
        );

        Ok(Self {
            renderer,
            config,
            model: TimelineModel {
                viewport: config.viewport,
                scale,
                layout_engine,
                snap: config.snap,
                visible_days: vec![displayed_day],
                events: IndexMap::new(),
                layouts: IndexMap::new(),
                scroll_offset: 0.0,
                edit: EditSession::default(),
                edit_origin: None,
                pinch: PinchZoomState::default(),
                snap_animation: None,
            },
            runtime: TimelineRuntimeState::with_full_invalidation(),
        })
    }
}
