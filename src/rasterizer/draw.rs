//! Line drawing in world space and the floor grid overlay

use super::camera::Camera;
use super::math::{Vec3, NEAR_PLANE};
use super::render::Framebuffer;
use super::types::Color;

/// Draw a depth-tested 3D line, clipped against the near plane.
pub fn draw_3d_line_clipped(
    fb: &mut Framebuffer,
    camera: &Camera,
    p0: Vec3,
    p1: Vec3,
    color: Color,
) {
    let z0 = camera.to_camera_space(p0).z;
    let z1 = camera.to_camera_space(p1).z;

    // Both behind camera - skip entirely
    if z0 <= NEAR_PLANE && z1 <= NEAR_PLANE {
        return;
    }

    // Nudge the clip point just past the near plane so projection accepts it
    let clip_z = NEAR_PLANE + 1e-4;
    let (a, b) = if z0 <= NEAR_PLANE {
        let t = (clip_z - z0) / (z1 - z0);
        (p0 + (p1 - p0) * t, p1)
    } else if z1 <= NEAR_PLANE {
        let t = (clip_z - z0) / (z1 - z0);
        (p0, p0 + (p1 - p0) * t)
    } else {
        (p0, p1)
    };

    let s0 = camera.world_to_screen(a, fb.width, fb.height);
    let s1 = camera.world_to_screen(b, fb.width, fb.height);
    if let (Some(s0), Some(s1)) = (s0, s1) {
        fb.draw_line_3d(s0.x as i32, s0.y as i32, s0.z, s1.x as i32, s1.y as i32, s1.z, color);
    }
}

/// Floor grid appearance
#[derive(Debug, Clone, Copy)]
pub struct GridStyle {
    /// Height of the grid plane
    pub y: f32,
    /// Distance between grid lines
    pub spacing: f32,
    /// Half-size of the grid (grid goes from -extent to +extent)
    pub extent: f32,
    pub line_color: Color,
    /// Color for the line at z = 0
    pub x_axis_color: Color,
    /// Color for the line at x = 0
    pub z_axis_color: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            y: 0.001,
            spacing: 0.25,
            extent: 2.0,
            line_color: Color::new(100, 100, 100),
            x_axis_color: Color::new(150, 60, 60),
            z_axis_color: Color::new(60, 60, 150),
        }
    }
}

/// Draw a floor grid on a horizontal plane.
/// Lines are split into one-cell segments so near-plane clipping stays local.
pub fn draw_floor_grid(fb: &mut Framebuffer, camera: &Camera, style: &GridStyle) {
    if style.spacing <= 0.0 || style.extent <= 0.0 {
        return;
    }
    let steps = (2.0 * style.extent / style.spacing).round() as i32;

    for i in 0..=steps {
        let offset = -style.extent + i as f32 * style.spacing;
        let on_axis = offset.abs() < 0.001;

        for j in 0..steps {
            let from = -style.extent + j as f32 * style.spacing;
            let to = (from + style.spacing).min(style.extent);

            // X-parallel line at z = offset
            let color = if on_axis { style.x_axis_color } else { style.line_color };
            draw_3d_line_clipped(
                fb,
                camera,
                Vec3::new(from, style.y, offset),
                Vec3::new(to, style.y, offset),
                color,
            );

            // Z-parallel line at x = offset
            let color = if on_axis { style.z_axis_color } else { style.line_color };
            draw_3d_line_clipped(
                fb,
                camera,
                Vec3::new(offset, style.y, from),
                Vec3::new(offset, style.y, to),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_crossing_near_plane_is_clipped() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        let camera = Camera::look_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 90.0);
        // Runs from behind the camera to the floor in front of it
        draw_3d_line_clipped(
            &mut fb,
            &camera,
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -5.0),
            Color::WHITE,
        );
        let lit = fb.pixels.chunks_exact(4).filter(|p| p[0] == 255).count();
        assert!(lit > 0);
    }

    #[test]
    fn test_line_fully_behind_is_skipped() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear(Color::BLACK);
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 60.0);
        draw_3d_line_clipped(&mut fb, &camera, Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0), Color::WHITE);
        assert!(fb.pixels.chunks_exact(4).all(|p| p[0] == 0));
    }
}
