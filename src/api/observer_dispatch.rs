use crate::extensions::{ObserverContext, TimelineEvent};
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    pub(super) fn observer_context(&self) -> ObserverContext {
        ObserverContext {
            viewport: self.model.viewport,
            points_per_minute: self.model.scale.points_per_minute(),
            scroll_offset: self.model.scroll_offset,
            visible_day_count: self.model.visible_days.len(),
            interaction_mode: self.interaction_mode(),
            edit_mode: self.model.edit.mode(),
        }
    }

    pub(super) fn emit_timeline_event(&mut self, event: TimelineEvent) {
        if self.runtime.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.runtime.observers {
            observer.on_event(&event, context);
        }
    }
}
