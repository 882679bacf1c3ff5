//! Grab / release state machine for the prop
//!
//! Two states, `Free` and `Attached`, driven by a single toggle. Attaching is
//! guarded by the hand pose and the palm's distance to the prop; releasing is
//! never refused. Leaving `Attached` drops the prop to the ground plane while
//! keeping its orientation and scale.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{Mat4, Vec3, mat4_mul, mat4_position, mat4_with_translation};
use super::state::ArmPose;

/// Thresholds for the grab guard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabRules {
    /// Minimum finger base angle (degrees) for a closed hand
    pub finger_base_threshold: f32,
    /// Minimum absolute finger tip angle (degrees) for a closed hand
    pub finger_tip_threshold: f32,
    /// Maximum palm to prop distance, inclusive
    pub grab_radius: f32,
}

impl Default for GrabRules {
    fn default() -> Self {
        Self {
            finger_base_threshold: 10.0,
            finger_tip_threshold: 20.0,
            grab_radius: 0.35,
        }
    }
}

impl GrabRules {
    pub fn pose_closed(&self, pose: &ArmPose) -> bool {
        pose.finger_base_angle >= self.finger_base_threshold
            && pose.finger_tip_angle.abs() >= self.finger_tip_threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    #[default]
    Free,
    Attached,
}

/// Why a grab attempt was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabDenial {
    AlreadyAttached,
    PoseOpen,
    /// The prop layer has not reported a pose yet
    PropUnplaced,
    OutOfReach { distance: f32, radius: f32 },
}

impl fmt::Display for GrabDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrabDenial::AlreadyAttached => write!(f, "already holding the prop"),
            GrabDenial::PoseOpen => write!(f, "hand is open"),
            GrabDenial::PropUnplaced => write!(f, "prop not placed yet"),
            GrabDenial::OutOfReach { distance, radius } => {
                write!(f, "too far ({:.2} > {:.2})", distance, radius)
            }
        }
    }
}

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabTransition {
    Attached,
    Released,
    Denied(GrabDenial),
}

/// The prop's grab state and world pose
#[derive(Debug, Clone, PartialEq)]
pub struct PropState {
    state: GrabState,
    /// Authoritative while free; rewritten from the palm every frame while attached
    world_transform: Option<Mat4>,
    local_grasp_offset: Mat4,
}

impl PropState {
    /// A free prop whose pose is not known yet
    pub fn new(local_grasp_offset: Mat4) -> Self {
        Self {
            state: GrabState::Free,
            world_transform: None,
            local_grasp_offset,
        }
    }

    /// Set the resting pose reported by the prop layer. Ignored while attached,
    /// since the palm owns the pose then.
    pub fn place(&mut self, rest: Mat4) {
        if !self.is_attached() {
            self.world_transform = Some(rest);
        }
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state == GrabState::Attached
    }

    pub fn world_transform(&self) -> Option<&Mat4> {
        self.world_transform.as_ref()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.world_transform().map(mat4_position)
    }

    pub fn local_grasp_offset(&self) -> &Mat4 {
        &self.local_grasp_offset
    }

    /// Guard for `Free -> Attached`
    pub fn can_grab(&self, pose: &ArmPose, palm: &Mat4, rules: &GrabRules) -> Result<(), GrabDenial> {
        if self.state == GrabState::Attached {
            return Err(GrabDenial::AlreadyAttached);
        }
        if !rules.pose_closed(pose) {
            return Err(GrabDenial::PoseOpen);
        }
        let prop = self.position().ok_or(GrabDenial::PropUnplaced)?;
        let distance = mat4_position(palm).distance(prop);
        if distance <= rules.grab_radius {
            Ok(())
        } else {
            Err(GrabDenial::OutOfReach { distance, radius: rules.grab_radius })
        }
    }

    /// Handle the grab toggle. Denied attempts leave the state untouched.
    pub fn toggle(&mut self, pose: &ArmPose, palm: &Mat4, rules: &GrabRules) -> GrabTransition {
        match self.state {
            GrabState::Attached => {
                self.on_exit_attached();
                self.state = GrabState::Free;
                GrabTransition::Released
            }
            GrabState::Free => match self.can_grab(pose, palm, rules) {
                Ok(()) => {
                    self.state = GrabState::Attached;
                    self.on_enter_attached(palm);
                    GrabTransition::Attached
                }
                Err(denial) => GrabTransition::Denied(denial),
            },
        }
    }

    /// Per-frame update: while attached the prop follows the palm.
    /// Returns the pose to draw this frame.
    pub fn track(&mut self, palm: &Mat4) -> Option<Mat4> {
        if self.is_attached() {
            self.world_transform = Some(self.attached_transform(palm));
        }
        self.world_transform
    }

    fn attached_transform(&self, palm: &Mat4) -> Mat4 {
        mat4_mul(palm, self.local_grasp_offset())
    }

    fn on_enter_attached(&mut self, palm: &Mat4) {
        self.world_transform = Some(self.attached_transform(palm));
    }

    /// Freeze the last attached pose on the ground plane
    fn on_exit_attached(&mut self) {
        if let Some(last) = self.world_transform {
            let p = mat4_position(&last);
            self.world_transform = Some(mat4_with_translation(&last, Vec3::new(p.x, 0.0, p.z)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::chain::{build_chain, RigDimensions};
    use crate::rasterizer::math::{mat4_approx_eq, mat4_chain, mat4_rotation_y, mat4_rotation_z, mat4_scale, mat4_translation};

    fn grasp_offset() -> Mat4 {
        mat4_chain(&[
            mat4_translation(Vec3::new(0.04, 0.08, 0.0)),
            mat4_rotation_y(90.0),
            mat4_scale(Vec3::new(0.08, 0.08, 0.08)),
        ])
    }

    fn closed_pose() -> ArmPose {
        ArmPose { finger_base_angle: 45.0, finger_tip_angle: -90.0, ..ArmPose::ZERO }
    }

    fn at(x: f32, y: f32, z: f32) -> Mat4 {
        mat4_translation(Vec3::new(x, y, z))
    }

    fn placed_at_origin() -> PropState {
        let mut prop = PropState::new(grasp_offset());
        prop.place(at(0.0, 0.0, 0.0));
        prop
    }

    #[test]
    fn test_pose_gate() {
        let rules = GrabRules::default();
        let prop = placed_at_origin();
        let palm = at(0.1, 0.0, 0.0);
        assert_eq!(prop.can_grab(&ArmPose::ZERO, &palm, &rules), Err(GrabDenial::PoseOpen));

        let pose = ArmPose { finger_base_angle: 10.0, finger_tip_angle: -20.0, ..ArmPose::ZERO };
        assert_eq!(prop.can_grab(&pose, &palm, &rules), Ok(()));
        // Only the tip threshold uses the absolute value
        let pose = ArmPose { finger_base_angle: -30.0, finger_tip_angle: 30.0, ..ArmPose::ZERO };
        assert_eq!(prop.can_grab(&pose, &palm, &rules), Err(GrabDenial::PoseOpen));
    }

    #[test]
    fn test_distance_boundary_is_inclusive() {
        let rules = GrabRules::default();
        let prop = placed_at_origin();
        let r = rules.grab_radius;
        assert_eq!(prop.can_grab(&closed_pose(), &at(r, 0.0, 0.0), &rules), Ok(()));
        assert!(matches!(
            prop.can_grab(&closed_pose(), &at(r + 1e-4, 0.0, 0.0), &rules),
            Err(GrabDenial::OutOfReach { .. })
        ));
    }

    #[test]
    fn test_unplaced_prop_is_out_of_reach() {
        let rules = GrabRules::default();
        let mut prop = PropState::new(grasp_offset());
        let palm = at(0.0, 0.0, 0.0);
        assert_eq!(prop.can_grab(&closed_pose(), &palm, &rules), Err(GrabDenial::PropUnplaced));
        assert_eq!(
            prop.toggle(&closed_pose(), &palm, &rules),
            GrabTransition::Denied(GrabDenial::PropUnplaced)
        );
        assert_eq!(prop.track(&palm), None);
    }

    #[test]
    fn test_denied_toggle_changes_nothing() {
        let rules = GrabRules::default();
        let mut prop = placed_at_origin();
        let before = prop.clone();
        let result = prop.toggle(&closed_pose(), &at(2.0, 0.0, 0.0), &rules);
        assert!(matches!(result, GrabTransition::Denied(GrabDenial::OutOfReach { .. })));
        assert_eq!(prop, before);
        prop.toggle(&ArmPose::ZERO, &at(0.0, 0.0, 0.0), &rules);
        assert_eq!(prop, before);
    }

    #[test]
    fn test_attach_track_release_round_trip() {
        let rules = GrabRules::default();
        let rig = RigDimensions::default();
        let mut prop = PropState::new(grasp_offset());
        prop.place(at(0.5, 0.0, 0.0));

        // Tall pole with the arm hanging straight down: palm ends near (0.5, 0.1, 0)
        let mut pose = closed_pose();
        pose.base_x = 0.5;
        pose.shoulder_angle = 180.0;
        let rig_low = RigDimensions { shoulder_offset: 1.3, ..rig };
        let frames = build_chain(&pose, &rig_low);
        assert!((frames.palm_position().y - 0.1).abs() < 1e-4);
        assert!(frames.palm_position().distance(Vec3::new(0.5, 0.0, 0.0)) < rules.grab_radius);

        assert_eq!(prop.toggle(&pose, &frames.palm, &rules), GrabTransition::Attached);
        assert!(prop.is_attached());
        let expected = mat4_mul(&frames.palm, &grasp_offset());
        assert_eq!(prop.world_transform(), Some(&expected));

        // Move the arm while attached; the prop tracks every frame
        pose.base_spin = 40.0;
        pose.elbow_angle = 25.0;
        let moved = build_chain(&pose, &rig_low);
        let tracked = prop.track(&moved.palm);
        let last = mat4_mul(&moved.palm, &grasp_offset());
        assert_eq!(tracked, Some(last));

        // Release anywhere: drops to y = 0, keeps everything else
        let open = ArmPose::ZERO;
        assert_eq!(prop.toggle(&open, &at(9.0, 9.0, 9.0), &rules), GrabTransition::Released);
        assert_eq!(prop.state(), GrabState::Free);
        let frozen = *prop.world_transform().unwrap();
        assert_eq!(mat4_position(&frozen).y, 0.0);
        assert_eq!(mat4_position(&frozen).x, mat4_position(&last).x);
        assert_eq!(mat4_position(&frozen).z, mat4_position(&last).z);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(frozen[i][j], last[i][j]);
            }
        }

        // Free prop stays put on later frames
        assert_eq!(prop.track(&moved.palm), Some(frozen));
    }

    #[test]
    fn test_release_is_unconditional() {
        let rules = GrabRules::default();
        let mut prop = placed_at_origin();
        let palm = mat4_chain(&[at(0.0, 0.3, 0.0), mat4_rotation_z(30.0)]);
        assert_eq!(prop.toggle(&closed_pose(), &palm, &rules), GrabTransition::Attached);
        assert_eq!(
            prop.toggle(&ArmPose::ZERO, &at(100.0, 100.0, 100.0), &rules),
            GrabTransition::Released
        );
        assert!(!prop.is_attached());
    }

    #[test]
    fn test_place_ignored_while_attached() {
        let rules = GrabRules::default();
        let mut prop = placed_at_origin();
        let palm = at(0.0, 0.2, 0.0);
        prop.toggle(&closed_pose(), &palm, &rules);
        prop.place(at(5.0, 0.0, 5.0));
        let expected = mat4_mul(&palm, &grasp_offset());
        assert!(mat4_approx_eq(prop.world_transform().unwrap(), &expected, 0.0));
    }
}
