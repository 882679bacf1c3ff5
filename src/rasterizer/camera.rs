//! Camera for 3D rendering
//!
//! A fixed look-at camera with a vertical field of view. Screen Y grows
//! downward, world Y is up.

use super::math::{Vec3, NEAR_PLANE};

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn look_at(position: Vec3, target: Vec3, fov_y: f32) -> Self {
        let mut cam = Self {
            position,
            target,
            fov_y,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let forward = (self.target - self.position).normalize();
        let mut right = forward.cross(Vec3::UP);
        if right.len() < 1e-6 {
            // Looking straight up or down
            right = Vec3::new(1.0, 0.0, 0.0);
        }
        self.basis_z = forward;
        self.basis_x = right.normalize();
        self.basis_y = self.basis_x.cross(self.basis_z);
    }

    /// World point to camera space (x right, y up, z forward)
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        let rel = p - self.position;
        Vec3::new(rel.dot(self.basis_x), rel.dot(self.basis_y), rel.dot(self.basis_z))
    }

    /// Focal length in pixels for a framebuffer of the given height
    pub fn focal_length(&self, fb_height: usize) -> f32 {
        (fb_height as f32 / 2.0) / (self.fov_y.to_radians() / 2.0).tan()
    }

    /// Project a camera-space point to framebuffer coordinates.
    /// Returns (screen_x, screen_y, depth); None when behind the near plane.
    pub fn project(&self, cam: Vec3, fb_width: usize, fb_height: usize) -> Option<Vec3> {
        if cam.z <= NEAR_PLANE {
            return None;
        }
        let f = self.focal_length(fb_height);
        Some(Vec3::new(
            fb_width as f32 / 2.0 + cam.x * f / cam.z,
            fb_height as f32 / 2.0 - cam.y * f / cam.z,
            cam.z,
        ))
    }

    /// Project a world-space point to framebuffer coordinates with depth.
    pub fn world_to_screen(&self, world: Vec3, fb_width: usize, fb_height: usize) -> Option<Vec3> {
        self.project(self.to_camera_space(world), fb_width, fb_height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 1.5, 2.5), Vec3::new(0.0, 0.83, 0.0), 45.0)
    }
}
