use tilescape_input::LogicalKey;
use winit::keyboard::KeyCode;

/// Physical key to camera key. Bindings follow key position, so WASD stays
/// put on non-QWERTY layouts.
pub fn logical_key(code: KeyCode) -> LogicalKey {
    match code {
        KeyCode::KeyW => LogicalKey::W,
        KeyCode::KeyA => LogicalKey::A,
        KeyCode::KeyS => LogicalKey::S,
        KeyCode::KeyD => LogicalKey::D,
        KeyCode::KeyQ => LogicalKey::Q,
        KeyCode::KeyE => LogicalKey::E,
        KeyCode::ArrowUp => LogicalKey::ArrowUp,
        KeyCode::ArrowDown => LogicalKey::ArrowDown,
        KeyCode::ArrowLeft => LogicalKey::ArrowLeft,
        KeyCode::ArrowRight => LogicalKey::ArrowRight,
        KeyCode::PageUp => LogicalKey::PageUp,
        KeyCode::PageDown => LogicalKey::PageDown,
        _ => LogicalKey::Other,
    }
}
