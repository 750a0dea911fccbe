use tracing::debug;

use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelineObserver;
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    /// Adds an observer. Ids must be non-empty and unique within the engine.
    pub fn register_observer(&mut self, observer: Box<dyn TimelineObserver>) -> TimelineResult<()> {
        let rejection = match observer.id() {
            "" => Some("observer id must not be empty".to_owned()),
            id if self.has_observer(id) => Some(format!("observer `{id}` is already registered")),
            id => {
                debug!(observer = id, "observer registered");
                None
            }
        };
        if let Some(reason) = rejection {
            return Err(TimelineError::InvalidData(reason));
        }
        self.runtime.observers.push(observer);
        Ok(())
    }

    /// Drops the observer registered under `observer_id`.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let before = self.runtime.observers.len();
        self.runtime
            .observers
            .retain(|observer| observer.id() != observer_id);
        let removed = self.runtime.observers.len() != before;
        if removed {
            debug!(observer = observer_id, "observer unregistered");
        }
        removed
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.runtime.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.runtime
            .observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }
}
