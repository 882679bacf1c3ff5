//! Scene dispatch
//!
//! Turns the arm's frames and the prop pose into draw calls. Anything that can
//! draw a transformed, coloured shape implements `DrawSink`; the software
//! rasterizer backend is `FramebufferSink`.

mod framebuffer_sink;
mod parts;

use crate::arm::{ArmFrames, RigDimensions};
use crate::rasterizer::{Color, Mat4, Vec3, mat4_scale};

pub use framebuffer_sink::{FramebufferSink, SceneMeshes};
use parts::joint_parts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Ground,
    Arm,
    Joint,
    Finger,
    FingerJoint,
    Prop,
}

impl Material {
    pub fn color(self) -> Color {
        match self {
            Material::Ground | Material::Arm | Material::FingerJoint => Color::from_f32(0.5, 0.5, 0.5),
            Material::Joint => Color::from_f32(0.0, 0.27, 0.47),
            Material::Finger => Color::from_f32(0.59, 0.0, 0.09),
            Material::Prop => Color::from_f32(1.0, 1.0, 0.0),
        }
    }
}

/// Unit meshes a draw call can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cylinder,
    Cone,
    Sphere,
    Plane,
    /// The loaded prop model
    Prop,
}

/// Shading mode selected before a batch of draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Unlit ground with a grid overlay
    Floor,
    /// Directional light with ambient floor
    Lit,
}

pub trait DrawSink {
    fn set_shading(&mut self, shading: Shading);
    fn draw(&mut self, transform: &Mat4, material: Material, shape: Shape);
}

/// Half-size of the ground square
pub const GROUND_EXTENT: f32 = 2.0;

/// Issue one frame's draw calls: ground, then every arm part parent-first,
/// then the prop when its pose is known.
pub fn draw_scene<S: DrawSink + ?Sized>(
    sink: &mut S,
    frames: &ArmFrames,
    prop: Option<&Mat4>,
    rig: &RigDimensions,
) {
    sink.set_shading(Shading::Floor);
    sink.draw(
        &mat4_scale(Vec3::new(GROUND_EXTENT, 1.0, GROUND_EXTENT)),
        Material::Ground,
        Shape::Plane,
    );

    sink.set_shading(Shading::Lit);
    for (joint, frame) in frames.iter() {
        for part in joint_parts(joint, frame, rig) {
            sink.draw(&part.transform, part.material, part.shape);
        }
    }

    if let Some(prop) = prop {
        sink.draw(prop, Material::Prop, Shape::Prop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::chain::Finger;
    use crate::arm::{build_chain, ArmPose, Joint};
    use crate::rasterizer::math::mat4_transform_point;
    use crate::rasterizer::{mat4_position, mat4_translation};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Shading(Shading),
        Draw(Mat4, Material, Shape),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl DrawSink for Recorder {
        fn set_shading(&mut self, shading: Shading) {
            self.calls.push(Call::Shading(shading));
        }
        fn draw(&mut self, transform: &Mat4, material: Material, shape: Shape) {
            self.calls.push(Call::Draw(*transform, material, shape));
        }
    }

    fn record(prop: Option<&Mat4>) -> Vec<Call> {
        let rig = RigDimensions::default();
        let frames = build_chain(&ArmPose::initial(), &rig);
        let mut rec = Recorder::default();
        draw_scene(&mut rec, &frames, prop, &rig);
        rec.calls
    }

    #[test]
    fn test_ground_is_drawn_first_with_floor_shading() {
        let calls = record(None);
        assert_eq!(calls[0], Call::Shading(Shading::Floor));
        assert!(matches!(calls[1], Call::Draw(_, Material::Ground, Shape::Plane)));
        assert_eq!(calls[2], Call::Shading(Shading::Lit));
    }

    #[test]
    fn test_prop_drawn_once_last_when_placed() {
        let prop = mat4_translation(Vec3::new(0.5, 0.0, 0.0));
        let calls = record(Some(&prop));
        let props: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Draw(_, Material::Prop, _)))
            .collect();
        assert_eq!(props.len(), 1);
        assert_eq!(calls.last(), Some(&Call::Draw(prop, Material::Prop, Shape::Prop)));

        let without = record(None);
        assert!(!without.iter().any(|c| matches!(c, Call::Draw(_, Material::Prop, _))));
    }

    #[test]
    fn test_parts_follow_hierarchy_order() {
        let rig = RigDimensions::default();
        let frames = build_chain(&ArmPose::initial(), &rig);
        let expected: Vec<Call> = Joint::HIERARCHY
            .iter()
            .flat_map(|&j| joint_parts(j, frames.get(j), &rig))
            .map(|p| Call::Draw(p.transform, p.material, p.shape))
            .collect();
        let calls = record(None);
        assert_eq!(&calls[3..], expected.as_slice());
    }

    #[test]
    fn test_segments_span_parent_to_child() {
        let rig = RigDimensions::default();
        let frames = build_chain(&ArmPose::initial(), &rig);
        let close = |a: Vec3, b: Vec3| a.distance(b) < 1e-5;
        let spans = [
            (Joint::Base, Joint::Shoulder),
            (Joint::Shoulder, Joint::Elbow),
            (Joint::Elbow, Joint::Wrist),
            (Joint::Wrist, Joint::Palm),
            (Joint::FingerBase(Finger::First), Joint::FingerTip(Finger::First)),
        ];
        for (from, to) in spans {
            let seg = joint_parts(from, frames.get(from), &rig)
                .into_iter()
                .find(|p| p.material != Material::Joint && p.shape == Shape::Cylinder)
                .unwrap();
            let bottom = mat4_transform_point(&seg.transform, Vec3::new(0.0, -0.5, 0.0));
            let top = mat4_transform_point(&seg.transform, Vec3::new(0.0, 0.5, 0.0));
            assert!(close(bottom, mat4_position(frames.get(from))), "{:?} bottom", from);
            assert!(close(top, mat4_position(frames.get(to))), "{:?} top", from);
        }
    }

    #[test]
    fn test_material_palette() {
        assert_eq!(Material::Prop.color(), Color::new(255, 255, 0));
        assert_eq!(Material::Arm.color(), Material::Ground.color());
        assert_ne!(Material::Finger.color(), Material::Joint.color());
    }
}
