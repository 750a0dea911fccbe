mod edit_session;
mod pinch;
mod snap_animation;

pub use edit_session::{CommittedEdit, EditGeometry, EditMode, EditSession};
pub use pinch::PinchZoomState;
pub use snap_animation::SnapAnimation;

use serde::{Deserialize, Serialize};

/// Coarse interaction phase exposed to observers and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Editing,
    Pinching,
}
