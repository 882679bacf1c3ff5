//! Arm pose and interaction state
//!
//! Angles are in degrees and never wrapped or clamped.

use serde::{Serialize, Deserialize};

/// Which group of joint parameters pointer drags currently drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlChannel {
    #[default]
    Base,
    Spin,
    ShoulderElbow,
    Wrist,
    Fingers,
}

impl ControlChannel {
    pub const ALL: [ControlChannel; 5] = [
        ControlChannel::Base,
        ControlChannel::Spin,
        ControlChannel::ShoulderElbow,
        ControlChannel::Wrist,
        ControlChannel::Fingers,
    ];

    /// Position in `ALL`
    pub fn index(self) -> usize {
        match self {
            ControlChannel::Base => 0,
            ControlChannel::Spin => 1,
            ControlChannel::ShoulderElbow => 2,
            ControlChannel::Wrist => 3,
            ControlChannel::Fingers => 4,
        }
    }

    /// Channel selected by the number keys 1-5
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=5 => Some(Self::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlChannel::Base => "Base",
            ControlChannel::Spin => "Spin",
            ControlChannel::ShoulderElbow => "Shoulder / Elbow",
            ControlChannel::Wrist => "Wrist",
            ControlChannel::Fingers => "Fingers",
        }
    }
}

/// Joint angles and base placement.
///
/// Finger angles are shared: the second finger uses their negations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmPose {
    /// Base offset on the ground plane (y is always 0)
    pub base_x: f32,
    pub base_z: f32,
    /// Rotation of the base about the vertical axis
    pub base_spin: f32,
    pub shoulder_angle: f32,
    pub elbow_angle: f32,
    pub wrist_bend_angle: f32,
    pub wrist_twist_angle: f32,
    pub finger_base_angle: f32,
    pub finger_tip_angle: f32,
}

impl ArmPose {
    /// Every angle and offset at zero: the arm stands straight up at the origin
    pub const ZERO: ArmPose = ArmPose {
        base_x: 0.0,
        base_z: 0.0,
        base_spin: 0.0,
        shoulder_angle: 0.0,
        elbow_angle: 0.0,
        wrist_bend_angle: 0.0,
        wrist_twist_angle: 0.0,
        finger_base_angle: 0.0,
        finger_tip_angle: 0.0,
    };

    /// Startup pose: arm folded over toward the prop, hand half open
    pub const fn initial() -> Self {
        ArmPose {
            base_x: -0.5,
            shoulder_angle: -10.0,
            elbow_angle: -120.0,
            wrist_bend_angle: 90.0,
            wrist_twist_angle: 10.0,
            finger_base_angle: 45.0,
            finger_tip_angle: -90.0,
            ..Self::ZERO
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.base_x,
            self.base_z,
            self.base_spin,
            self.shoulder_angle,
            self.elbow_angle,
            self.wrist_bend_angle,
            self.wrist_twist_angle,
            self.finger_base_angle,
            self.finger_tip_angle,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl Default for ArmPose {
    fn default() -> Self {
        Self::initial()
    }
}

/// Everything the input mapper writes: the pose plus the drag mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArmState {
    pub pose: ArmPose,
    pub channel: ControlChannel,
    pub pointer_down: bool,
}

impl ArmState {
    pub fn new(pose: ArmPose) -> Self {
        Self {
            pose,
            channel: ControlChannel::Base,
            pointer_down: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_map_to_channels_in_order() {
        for (i, ch) in ControlChannel::ALL.iter().enumerate() {
            assert_eq!(ControlChannel::from_digit(i as u8 + 1), Some(*ch));
            assert_eq!(ch.index(), i);
        }
        assert_eq!(ControlChannel::from_digit(0), None);
        assert_eq!(ControlChannel::from_digit(6), None);
    }

    #[test]
    fn test_new_state_starts_on_base_channel() {
        let state = ArmState::new(ArmPose::initial());
        assert_eq!(state.channel, ControlChannel::Base);
        assert!(!state.pointer_down);
        assert_eq!(state.pose.elbow_angle, -120.0);
    }
}
