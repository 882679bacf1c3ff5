//! Geometry placed at each frame of the arm
//!
//! Segments are unit primitives stretched between consecutive frames, so their
//! lengths come straight from the rig and adjacent parts always meet.

use crate::arm::{Joint, RigDimensions};
use crate::rasterizer::{Mat4, Vec3, mat4_chain, mat4_rotation_x, mat4_scale, mat4_translation};
use super::{Material, Shape};

/// Thickness of the main arm segments
const ARM_WIDTH: f32 = 0.1;
const WRIST_WIDTH: f32 = 0.08;
const FINGER_WIDTH: f32 = 0.05;
/// Hinge drums at the shoulder, elbow and wrist
const HINGE_DIAMETER: f32 = 0.15;
const HINGE_DEPTH: f32 = 0.12;
const PLATTER_DIAMETER: f32 = 0.2;
const PLATTER_HEIGHT: f32 = 0.025;
const KNUCKLE_RADIUS: f32 = 0.06;
const FINGER_JOINT_RADIUS: f32 = 0.03;

/// One draw call: where, in what colour, which mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDraw {
    pub transform: Mat4,
    pub material: Material,
    pub shape: Shape,
}

/// Unit cylinder or cone stood on the frame's origin, running `length` up its y axis
fn segment(frame: &Mat4, length: f32, width: f32, material: Material, shape: Shape) -> PartDraw {
    PartDraw {
        transform: mat4_chain(&[
            *frame,
            mat4_translation(Vec3::new(0.0, length / 2.0, 0.0)),
            mat4_scale(Vec3::new(width, length, width)),
        ]),
        material,
        shape,
    }
}

/// Drum around the frame's z axis, the axis its joint turns about
fn hinge(frame: &Mat4) -> PartDraw {
    PartDraw {
        transform: mat4_chain(&[
            *frame,
            mat4_rotation_x(90.0),
            mat4_scale(Vec3::new(HINGE_DIAMETER, HINGE_DEPTH, HINGE_DIAMETER)),
        ]),
        material: Material::Joint,
        shape: Shape::Cylinder,
    }
}

fn ball(frame: &Mat4, radius: f32, material: Material) -> PartDraw {
    PartDraw {
        transform: mat4_chain(&[*frame, mat4_scale(Vec3::new(radius, radius, radius))]),
        material,
        shape: Shape::Sphere,
    }
}

/// Parts carried by one frame of the hierarchy
pub fn joint_parts(joint: Joint, frame: &Mat4, rig: &RigDimensions) -> Vec<PartDraw> {
    match joint {
        Joint::Base => vec![
            PartDraw {
                transform: mat4_chain(&[
                    *frame,
                    mat4_translation(Vec3::new(0.0, PLATTER_HEIGHT / 2.0, 0.0)),
                    mat4_scale(Vec3::new(PLATTER_DIAMETER, PLATTER_HEIGHT, PLATTER_DIAMETER)),
                ]),
                material: Material::Joint,
                shape: Shape::Cylinder,
            },
            segment(frame, rig.shoulder_offset, ARM_WIDTH, Material::Arm, Shape::Cylinder),
        ],
        Joint::Shoulder => vec![
            hinge(frame),
            segment(frame, rig.elbow_offset, ARM_WIDTH, Material::Arm, Shape::Cylinder),
        ],
        Joint::Elbow => vec![
            hinge(frame),
            segment(frame, rig.wrist_offset, ARM_WIDTH, Material::Arm, Shape::Cylinder),
        ],
        Joint::Wrist => vec![
            hinge(frame),
            segment(frame, rig.palm_offset, WRIST_WIDTH, Material::Finger, Shape::Cylinder),
        ],
        Joint::Palm => vec![ball(frame, KNUCKLE_RADIUS, Material::FingerJoint)],
        Joint::FingerBase(_) => vec![
            segment(frame, rig.finger_base_length, FINGER_WIDTH, Material::Finger, Shape::Cylinder),
        ],
        Joint::FingerTip(_) => vec![
            ball(frame, FINGER_JOINT_RADIUS, Material::FingerJoint),
            segment(frame, rig.finger_tip_length, FINGER_WIDTH, Material::Finger, Shape::Cone),
        ],
    }
}
