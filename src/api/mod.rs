mod data_controller;
mod edit_controller;
mod engine;
mod engine_config;
mod engine_init;
mod engine_snapshot;
mod frame_scheduler;
mod layout_coordinator;
mod observer_dispatch;
mod observer_registry;
mod timeline_model;
mod timeline_runtime;
mod validation;
mod zoom_controller;

pub use engine::TimelineEngine;
pub use engine_config::TimelineConfig;
pub use engine_snapshot::TimelineSnapshot;
pub use frame_scheduler::FrameTickOutcome;
pub use layout_coordinator::TimelineHit;
