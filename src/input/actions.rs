//! Input events and key bindings

use macroquad::prelude::KeyCode;
use crate::arm::ControlChannel;

/// Everything the frame loop reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    SelectChannel(ControlChannel),
    /// Edge-triggered grab / release
    ToggleGrab,
    Quit,
    /// Drag button pressed (true) or released (false)
    PointerButton(bool),
    /// Cursor position in window pixels
    PointerMoved { x: f32, y: f32 },
    Resized { width: f32, height: f32 },
}

/// Number keys, in channel order
pub const CHANNEL_KEYS: [KeyCode; 5] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
];

/// Keys with a fixed action
pub const KEY_BINDINGS: [(KeyCode, InputEvent); 2] = [
    (KeyCode::Space, InputEvent::ToggleGrab),
    (KeyCode::Escape, InputEvent::Quit),
];

/// Event fired when `key` goes down, if it is bound
pub fn key_event(key: KeyCode) -> Option<InputEvent> {
    if let Some(i) = CHANNEL_KEYS.iter().position(|k| *k == key) {
        return ControlChannel::from_digit(i as u8 + 1).map(InputEvent::SelectChannel);
    }
    KEY_BINDINGS.iter().find(|(k, _)| *k == key).map(|(_, e)| *e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keys_select_channels_in_order() {
        for (key, channel) in CHANNEL_KEYS.iter().zip(ControlChannel::ALL) {
            assert_eq!(key_event(*key), Some(InputEvent::SelectChannel(channel)));
        }
    }

    #[test]
    fn test_grab_and_quit_keys() {
        assert_eq!(key_event(KeyCode::Space), Some(InputEvent::ToggleGrab));
        assert_eq!(key_event(KeyCode::Escape), Some(InputEvent::Quit));
        assert_eq!(key_event(KeyCode::Q), None);
    }
}
