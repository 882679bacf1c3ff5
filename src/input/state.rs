//! Per-frame device polling

use macroquad::prelude::*;
use super::{key_event, InputEvent};

/// Remembers what was already reported so only changes become events
pub struct InputState {
    last_mouse: Option<(f32, f32)>,
    last_size: Option<(f32, f32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            last_mouse: None,
            last_size: None,
        }
    }

    /// Call once per frame, before the app steps
    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let size = (screen_width(), screen_height());
        if self.last_size != Some(size) {
            self.last_size = Some(size);
            events.push(InputEvent::Resized { width: size.0, height: size.1 });
        }

        events.extend(get_keys_pressed().into_iter().filter_map(key_event));

        // Motion before buttons: a press only drags with motion from later frames
        let mouse = mouse_position();
        if self.last_mouse != Some(mouse) {
            self.last_mouse = Some(mouse);
            events.push(InputEvent::PointerMoved { x: mouse.0, y: mouse.1 });
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            events.push(InputEvent::PointerButton(true));
        }
        if is_mouse_button_released(MouseButton::Left) {
            events.push(InputEvent::PointerButton(false));
        }

        events
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
