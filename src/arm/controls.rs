//! Pointer drag to joint angle mapping
//!
//! Each control channel owns a fixed set of pose fields. The binding table
//! below is the only place a drag can write to the pose, so a channel cannot
//! touch another channel's fields.

use super::state::{ArmPose, ArmState, ControlChannel};

/// Pointer motion normalized by the viewport: a full-width drag is 1.0.
/// `dy` is positive when the pointer moves up the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDelta {
    pub dx: f32,
    pub dy: f32,
}

/// Writes one channel's fields from a drag
type ChannelBinding = fn(&mut ArmPose, PointerDelta);

/// Indexed by `ControlChannel::index`
const BINDINGS: [ChannelBinding; 5] = [
    |p, d| {
        p.base_x += d.dx;
        p.base_z -= d.dy;
    },
    |p, d| p.base_spin += d.dx * 180.0,
    |p, d| {
        p.shoulder_angle += d.dy * -90.0;
        p.elbow_angle += d.dx * 90.0;
    },
    |p, d| {
        p.wrist_bend_angle += d.dy * -180.0;
        p.wrist_twist_angle += d.dx * 180.0;
    },
    |p, d| {
        p.finger_base_angle += d.dy * 90.0;
        p.finger_tip_angle += d.dx * 180.0;
    },
];

fn binding(channel: ControlChannel) -> ChannelBinding {
    BINDINGS[channel.index()]
}

/// Tracks the viewport and the last pointer position so raw cursor
/// coordinates can be turned into normalized drags.
#[derive(Debug, Clone)]
pub struct ArmControls {
    viewport_width: f32,
    viewport_height: f32,
    last_pointer: Option<(f32, f32)>,
}

impl ArmControls {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut controls = Self {
            viewport_width: 1.0,
            viewport_height: 1.0,
            last_pointer: None,
        };
        controls.resize(viewport_width, viewport_height);
        controls
    }

    /// Update the normalization denominators. Degenerate sizes (a minimized
    /// window) keep the previous values.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && width >= 1.0 {
            self.viewport_width = width;
        }
        if height.is_finite() && height >= 1.0 {
            self.viewport_height = height;
        }
    }

    pub fn select_channel(state: &mut ArmState, channel: ControlChannel) {
        state.channel = channel;
    }

    pub fn set_pointer_down(state: &mut ArmState, down: bool) {
        state.pointer_down = down;
    }

    /// Feed a cursor position in window pixels (y grows downward).
    ///
    /// The last position is always recorded, even while no drag is active, so
    /// pressing the button never produces a jump. Returns the delta that was
    /// applied to the pose, if any.
    pub fn pointer_moved(&mut self, state: &mut ArmState, x: f32, y: f32) -> Option<PointerDelta> {
        let previous = self.last_pointer.replace((x, y));
        let (last_x, last_y) = previous?;
        let delta = PointerDelta {
            dx: (x - last_x) / self.viewport_width,
            dy: (last_y - y) / self.viewport_height,
        };
        Self::apply_delta(state, delta).then_some(delta)
    }

    /// Apply a normalized drag to the active channel's fields.
    /// No-op (returns false) unless the pointer is down.
    pub fn apply_delta(state: &mut ArmState, delta: PointerDelta) -> bool {
        if !state.pointer_down {
            return false;
        }
        binding(state.channel)(&mut state.pose, delta);
        true
    }
}
