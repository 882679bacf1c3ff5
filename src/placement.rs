//! Placement of the prop in the config file
//!
//! A readable stand-in for a matrix: where the prop sits, how it is turned and
//! how big it is. `to_matrix` composes them as translate * rotate * scale.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Vec3, Mat4, mat4_chain, mat4_from_position_rotation, mat4_scale};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub position: Vec3,
    /// Euler angles in degrees, applied Z * Y * X
    pub rotation: Vec3,
    /// Same factor on every axis
    pub scale: f32,
}

impl Placement {
    pub fn new(position: Vec3, rotation: Vec3, scale: f32) -> Self {
        Self { position, rotation, scale }
    }

    pub fn to_matrix(&self) -> Mat4 {
        mat4_chain(&[
            mat4_from_position_rotation(self.position, self.rotation),
            mat4_scale(Vec3::new(self.scale, self.scale, self.scale)),
        ])
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{mat4_approx_eq, mat4_identity, mat4_rotation_y, mat4_translation};

    #[test]
    fn test_to_matrix_is_translate_rotate_scale() {
        let p = Placement::new(Vec3::new(0.04, 0.08, 0.0), Vec3::new(0.0, 90.0, 0.0), 0.08);
        let expected = mat4_chain(&[
            mat4_translation(Vec3::new(0.04, 0.08, 0.0)),
            mat4_rotation_y(90.0),
            mat4_scale(Vec3::new(0.08, 0.08, 0.08)),
        ]);
        assert!(mat4_approx_eq(&p.to_matrix(), &expected, 1e-6));
    }

    #[test]
    fn test_default_is_identity() {
        assert!(mat4_approx_eq(&Placement::default().to_matrix(), &mat4_identity(), 0.0));
    }

    #[test]
    fn test_scale_close_to_one_still_applies() {
        let m = Placement::new(Vec3::ZERO, Vec3::ZERO, 1.00005).to_matrix();
        assert_eq!(m[0][0], 1.00005);
        assert_eq!(m[1][1], 1.00005);
        assert_eq!(m[2][2], 1.00005);
    }
}
