//! Kinematic transform chain
//!
//! Every rigid part's world transform is derived from its parent's by a fixed
//! offset along the parent's local up axis followed by the joint's rotation:
//!
//! ```text
//! base       = T(x, 0, z) * Ry(spin)
//! shoulder   = base     * T(0, shoulder_offset, 0) * Rz(shoulder)
//! elbow      = shoulder * T(0, elbow_offset, 0)    * Rz(elbow)
//! wrist      = elbow    * T(0, wrist_offset, 0)    * Rz(bend) * Ry(twist)
//! palm       = wrist    * T(0, palm_offset, 0)
//! finger[i]  = palm     * T(s*d, 0, 0)             * Rz(s*finger_base)
//! tip[i]     = finger[i]* T(0, finger_base_len, 0) * Rz(s*finger_tip)
//! ```
//!
//! with `s = +1` for the first finger and `-1` for the second. The renderer and
//! the grab guard both read the same `ArmFrames`.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{
    Mat4, Vec3, mat4_chain, mat4_position, mat4_rotation_y, mat4_rotation_z, mat4_translation,
};
use super::state::ArmPose;

/// Segment lengths and finger spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigDimensions {
    pub shoulder_offset: f32,
    pub elbow_offset: f32,
    pub wrist_offset: f32,
    pub palm_offset: f32,
    /// Lateral distance from the palm centre to each finger
    pub finger_spacing: f32,
    pub finger_base_length: f32,
    /// Drawn length of the fingertip past its joint
    pub finger_tip_length: f32,
}

impl Default for RigDimensions {
    fn default() -> Self {
        Self {
            shoulder_offset: 0.40,
            elbow_offset: 0.50,
            wrist_offset: 0.50,
            palm_offset: 0.20,
            finger_spacing: 0.06,
            finger_base_length: 0.35,
            finger_tip_length: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    /// Sits at +d along the palm's x axis
    First,
    /// Mirror of the first, at -d
    Second,
}

impl Finger {
    pub const BOTH: [Finger; 2] = [Finger::First, Finger::Second];

    pub fn sign(self) -> f32 {
        match self {
            Finger::First => 1.0,
            Finger::Second => -1.0,
        }
    }

    fn index(self) -> usize {
        match self {
            Finger::First => 0,
            Finger::Second => 1,
        }
    }
}

/// Named frames of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
    Wrist,
    Palm,
    FingerBase(Finger),
    FingerTip(Finger),
}

impl Joint {
    /// Parent-to-child order
    pub const HIERARCHY: [Joint; 9] = [
        Joint::Base,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist,
        Joint::Palm,
        Joint::FingerBase(Finger::First),
        Joint::FingerBase(Finger::Second),
        Joint::FingerTip(Finger::First),
        Joint::FingerTip(Finger::Second),
    ];
}

/// World transforms of every rigid part for one pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmFrames {
    pub base: Mat4,
    pub shoulder: Mat4,
    pub elbow: Mat4,
    pub wrist: Mat4,
    pub palm: Mat4,
    pub finger_bases: [Mat4; 2],
    pub finger_tips: [Mat4; 2],
}

impl ArmFrames {
    pub fn get(&self, joint: Joint) -> &Mat4 {
        match joint {
            Joint::Base => &self.base,
            Joint::Shoulder => &self.shoulder,
            Joint::Elbow => &self.elbow,
            Joint::Wrist => &self.wrist,
            Joint::Palm => &self.palm,
            Joint::FingerBase(f) => &self.finger_bases[f.index()],
            Joint::FingerTip(f) => &self.finger_tips[f.index()],
        }
    }

    /// Frames in hierarchy order
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Mat4)> + '_ {
        Joint::HIERARCHY.iter().map(move |&j| (j, self.get(j)))
    }

    /// End effector position in world space
    pub fn palm_position(&self) -> Vec3 {
        mat4_position(&self.palm)
    }
}

/// Compute the world transform of every part. Pure and deterministic.
pub fn build_chain(pose: &ArmPose, rig: &RigDimensions) -> ArmFrames {
    let up = |len: f32| mat4_translation(Vec3::new(0.0, len, 0.0));

    let base = mat4_chain(&[
        mat4_translation(Vec3::new(pose.base_x, 0.0, pose.base_z)),
        mat4_rotation_y(pose.base_spin),
    ]);
    let shoulder = mat4_chain(&[base, up(rig.shoulder_offset), mat4_rotation_z(pose.shoulder_angle)]);
    let elbow = mat4_chain(&[shoulder, up(rig.elbow_offset), mat4_rotation_z(pose.elbow_angle)]);
    let wrist = mat4_chain(&[
        elbow,
        up(rig.wrist_offset),
        mat4_rotation_z(pose.wrist_bend_angle),
        mat4_rotation_y(pose.wrist_twist_angle),
    ]);
    let palm = mat4_chain(&[wrist, up(rig.palm_offset)]);

    let finger_base = |f: Finger| {
        let s = f.sign();
        mat4_chain(&[
            palm,
            mat4_translation(Vec3::new(s * rig.finger_spacing, 0.0, 0.0)),
            mat4_rotation_z(s * pose.finger_base_angle),
        ])
    };
    let finger_bases = Finger::BOTH.map(finger_base);

    let finger_tips = Finger::BOTH.map(|f| {
        mat4_chain(&[
            finger_bases[f.index()],
            up(rig.finger_base_length),
            mat4_rotation_z(f.sign() * pose.finger_tip_angle),
        ])
    });

    ArmFrames { base, shoulder, elbow, wrist, palm, finger_bases, finger_tips }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{mat4_approx_eq, mat4_identity, mat4_mul, mat4_scale, mat4_with_translation};

    fn posed(f: impl FnOnce(&mut ArmPose)) -> ArmPose {
        let mut pose = ArmPose::ZERO;
        f(&mut pose);
        pose
    }

    #[test]
    fn test_build_is_deterministic() {
        let rig = RigDimensions::default();
        let pose = posed(|p| {
            p.base_x = 0.3;
            p.base_spin = 1234.5;
            p.shoulder_angle = -33.0;
            p.wrist_twist_angle = 77.0;
            p.finger_tip_angle = -540.0;
        });
        assert_eq!(build_chain(&pose, &rig), build_chain(&pose, &rig));
    }

    #[test]
    fn test_zero_pose_stacks_offsets_vertically() {
        let rig = RigDimensions::default();
        let frames = build_chain(&ArmPose::ZERO, &rig);
        let palm = frames.palm_position();
        assert!(palm.x.abs() < 1e-6 && palm.z.abs() < 1e-6);
        assert!((palm.y - 1.6).abs() < 1e-5);
        // Rotation part is identity
        let no_translation = mat4_with_translation(&frames.palm, Vec3::ZERO);
        assert!(mat4_approx_eq(&no_translation, &mat4_identity(), 1e-6));
    }

    #[test]
    fn test_fingers_mirror_across_palm() {
        let rig = RigDimensions::default();
        let frames = build_chain(&posed(|p| {
            p.finger_base_angle = 37.0;
            p.finger_tip_angle = -64.0;
        }), &rig);
        // With an upright palm, mirroring x maps finger one onto finger two
        let mirror = mat4_scale(Vec3::new(-1.0, 1.0, 1.0));
        for (a, b) in [
            (frames.finger_bases[0], frames.finger_bases[1]),
            (frames.finger_tips[0], frames.finger_tips[1]),
        ] {
            let reflected = mat4_mul(&mat4_mul(&mirror, &a), &mirror);
            assert!(mat4_approx_eq(&reflected, &b, 1e-5));
        }
        let f1 = mat4_position(&frames.finger_bases[0]);
        let f2 = mat4_position(&frames.finger_bases[1]);
        assert!((f1.x - rig.finger_spacing).abs() < 1e-6);
        assert!((f2.x + rig.finger_spacing).abs() < 1e-6);
    }

    #[test]
    fn test_finger_base_rotations_are_opposite() {
        let rig = RigDimensions::default();
        let a = 25.0;
        let frames = build_chain(&posed(|p| p.finger_base_angle = a), &rig);
        let palm = frames.palm;
        let expected_first = mat4_chain(&[palm, mat4_translation(Vec3::new(rig.finger_spacing, 0.0, 0.0)), mat4_rotation_z(a)]);
        let expected_second = mat4_chain(&[palm, mat4_translation(Vec3::new(-rig.finger_spacing, 0.0, 0.0)), mat4_rotation_z(-a)]);
        assert_eq!(frames.finger_bases[0], expected_first);
        assert_eq!(frames.finger_bases[1], expected_second);
    }

    #[test]
    fn test_angles_are_not_wrapped() {
        let rig = RigDimensions::default();
        let a = build_chain(&posed(|p| p.shoulder_angle = 10.0), &rig);
        let b = build_chain(&posed(|p| p.shoulder_angle = 370.0), &rig);
        let c = build_chain(&posed(|p| p.shoulder_angle = 190.0), &rig);
        assert!(mat4_approx_eq(&a.palm, &b.palm, 1e-4));
        assert!(!mat4_approx_eq(&a.palm, &c.palm, 1e-2));
    }

    #[test]
    fn test_shoulder_rotation_swings_palm_sideways() {
        let rig = RigDimensions::default();
        let frames = build_chain(&posed(|p| p.shoulder_angle = 90.0), &rig);
        let palm = frames.palm_position();
        let arm = rig.elbow_offset + rig.wrist_offset + rig.palm_offset;
        assert!((palm.x + arm).abs() < 1e-5);
        assert!((palm.y - rig.shoulder_offset).abs() < 1e-5);
    }

    #[test]
    fn test_base_translation_and_spin() {
        let rig = RigDimensions::default();
        let frames = build_chain(&posed(|p| {
            p.base_x = 1.0;
            p.base_z = -2.0;
            p.base_spin = 90.0;
            p.shoulder_angle = 90.0;
        }), &rig);
        // Spin of 90 turns the shoulder's -x lean into +z
        let palm = frames.palm_position();
        let arm = rig.elbow_offset + rig.wrist_offset + rig.palm_offset;
        assert!((palm.x - 1.0).abs() < 1e-5);
        assert!((palm.z - (-2.0 + arm)).abs() < 1e-5);
    }

    fn parent_of(joint: Joint) -> Option<Joint> {
        match joint {
            Joint::Base => None,
            Joint::Shoulder => Some(Joint::Base),
            Joint::Elbow => Some(Joint::Shoulder),
            Joint::Wrist => Some(Joint::Elbow),
            Joint::Palm => Some(Joint::Wrist),
            Joint::FingerBase(_) => Some(Joint::Palm),
            Joint::FingerTip(f) => Some(Joint::FingerBase(f)),
        }
    }

    #[test]
    fn test_hierarchy_lists_parents_first() {
        for (i, joint) in Joint::HIERARCHY.iter().enumerate() {
            if let Some(parent) = parent_of(*joint) {
                let p = Joint::HIERARCHY.iter().position(|j| *j == parent).unwrap();
                assert!(p < i);
            }
        }
        let frames = build_chain(&ArmPose::initial(), &RigDimensions::default());
        assert_eq!(frames.iter().count(), 9);
    }
}
