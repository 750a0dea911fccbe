//! Host-facing hooks that sit outside the layout core.

pub mod observers;

pub use observers::{ObserverContext, TimelineEvent, TimelineObserver};
