use serde::{Deserialize, Serialize};

/// A high-level action the frame loop understands.
///
/// Platform layers translate raw key codes into actions; the kernel consumes
/// actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Raise movement speed by one step per frame while held.
    SpeedUp,
    /// Lower movement speed by one step per frame while held.
    SpeedDown,
    ResetCamera,
    ToggleDebugCamera,
    ToggleUiMode,
    ToggleFlashlight,
    FillMode,
    WireframeMode,
    Quit,
}

impl Action {
    /// Toggles fire once per released-to-pressed transition; everything else
    /// applies on every frame the action is held.
    pub fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            Action::ToggleDebugCamera | Action::ToggleUiMode | Action::ToggleFlashlight
        )
    }
}
