use shellfur_input::{Action, InputSnapshot};
use winit::keyboard::KeyCode;

/// Physical key bindings.
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyW => Action::MoveForward,
        KeyCode::KeyS => Action::MoveBackward,
        KeyCode::KeyA => Action::MoveLeft,
        KeyCode::KeyD => Action::MoveRight,
        KeyCode::Space => Action::MoveUp,
        KeyCode::Tab => Action::MoveDown,
        KeyCode::ShiftLeft => Action::SpeedUp,
        KeyCode::ControlLeft => Action::SpeedDown,
        KeyCode::KeyR => Action::ResetCamera,
        KeyCode::KeyP => Action::ToggleDebugCamera,
        KeyCode::Digit0 => Action::ToggleUiMode,
        KeyCode::KeyF => Action::ToggleFlashlight,
        KeyCode::Digit1 => Action::FillMode,
        KeyCode::Digit2 => Action::WireframeMode,
        KeyCode::Escape => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Leaving UI mode and quitting work even while a widget has keyboard focus.
fn bypasses_ui_focus(action: Action) -> bool {
    matches!(action, Action::ToggleUiMode | Action::Quit)
}

/// Apply one key transition to the frame's input.
///
/// `ui_consumed` is set when egui claimed the event. Such presses are
/// dropped, but releases always land so no action stays held.
pub fn route_key(input: &mut InputSnapshot, key: KeyCode, pressed: bool, ui_consumed: bool) {
    let Some(action) = action_for_key(key) else {
        return;
    };
    if pressed && ui_consumed && !bypasses_ui_focus(action) {
        return;
    }
    input.set(action, pressed);
}

/// Wheel movement reported in pixels is converted at this many pixels per line.
pub const PIXELS_PER_LINE: f32 = 40.0;
