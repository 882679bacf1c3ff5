//! Core rendering functions
//! Triangle rasterization with Gouraud shading and a depth buffer

use super::camera::Camera;
use super::math::{mat4_normal_matrix, mat4_transform_dir, mat4_transform_point, Mat4, Vec3};
use super::mesh::Mesh;
use super::types::{Color, RasterSettings, RasterStats};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    /// Depth-tested write. Returns true if the pixel was written.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let depth_idx = y * self.width + x;
        if z >= self.zbuffer[depth_idx] {
            return false;
        }
        self.zbuffer[depth_idx] = z;
        let idx = depth_idx * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        true
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    /// Bresenham line with interpolated depth, tested against the z-buffer
    pub fn draw_line_3d(&mut self, x0: i32, y0: i32, z0: f32, x1: i32, y1: i32, z1: f32, color: Color) {
        self.walk_line(x0, y0, z0, x1, y1, z1, |fb, x, y, z| {
            // Small bias so lines lying on a surface win against it
            fb.set_pixel_with_depth(x, y, z - 0.002, color);
        });
    }

    fn walk_line<F>(&mut self, x0: i32, y0: i32, z0: f32, x1: i32, y1: i32, z1: f32, mut plot: F)
    where
        F: FnMut(&mut Self, usize, usize, f32),
    {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0f32;

        loop {
            if x >= 0 && y >= 0 {
                let z = z0 + (z1 - z0) * (step / steps);
                plot(self, x as usize, y as usize, z);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1.0;
        }
    }
}

/// A triangle ready for rasterization: screen positions with camera depth in z
struct Surface {
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    c1: Color,
    c2: Color,
    c3: Color,
}

/// Render a mesh placed by `model` in a single base color
pub fn render_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    model: &Mat4,
    color: Color,
    camera: &Camera,
    settings: &RasterSettings,
) -> RasterStats {
    let mut stats = RasterStats::default();

    // Transform and light every vertex once
    let normal_matrix = mat4_normal_matrix(model);
    let mut projected: Vec<Option<Vec3>> = Vec::with_capacity(mesh.vertices.len());
    let mut shaded: Vec<Color> = Vec::with_capacity(mesh.vertices.len());
    for v in &mesh.vertices {
        let world = mat4_transform_point(model, v.pos);
        projected.push(camera.world_to_screen(world, fb.width, fb.height));
        let normal = mat4_transform_dir(&normal_matrix, v.normal).normalize();
        shaded.push(color.shade(settings.intensity(normal)));
    }

    for face in &mesh.faces {
        // Skip triangles with any vertex behind the near plane
        let (Some(v1), Some(v2), Some(v3)) = (projected[face.v0], projected[face.v1], projected[face.v2]) else {
            stats.triangles_culled += 1;
            continue;
        };

        let signed_area = (v2.x - v1.x) * (v3.y - v1.y) - (v3.x - v1.x) * (v2.y - v1.y);
        if signed_area.abs() < 1e-6 {
            stats.triangles_culled += 1;
            continue;
        }

        // Winding is not trusted; flip to a consistent orientation instead of culling
        let surface = if signed_area > 0.0 {
            Surface { v1, v2, v3, c1: shaded[face.v0], c2: shaded[face.v1], c3: shaded[face.v2] }
        } else {
            Surface { v1, v2: v3, v3: v2, c1: shaded[face.v0], c2: shaded[face.v2], c3: shaded[face.v1] }
        };

        rasterize_triangle(fb, &surface);
        stats.triangles_drawn += 1;
    }

    stats
}

fn rasterize_triangle(fb: &mut Framebuffer, surface: &Surface) {
    let (v1, v2, v3) = (surface.v1, surface.v2, surface.v3);

    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32).max(0.0) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32).max(0.0) as usize;

    // Early exit for degenerate/off-screen triangles
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Edge function: bc.x weights v1, bc.y weights v2
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    let (inv_z1, inv_z2, inv_z3) = (1.0 / v1.z, 1.0 / v2.z, 1.0 / v3.z);

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;

            let bc_x = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) * inv_area;
            let bc_y = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x < ERR || bc_y < ERR || bc_z < ERR {
                continue;
            }

            // 1/z interpolates linearly in screen space
            let inv_z = bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3;
            let z = 1.0 / inv_z;

            let color = Color::new(
                (bc_x * surface.c1.r as f32 + bc_y * surface.c2.r as f32 + bc_z * surface.c3.r as f32) as u8,
                (bc_x * surface.c1.g as f32 + bc_y * surface.c2.g as f32 + bc_z * surface.c3.g as f32) as u8,
                (bc_x * surface.c1.b as f32 + bc_y * surface.c2.b as f32 + bc_z * surface.c3.b as f32) as u8,
            );
            fb.set_pixel_with_depth(x, y, z, color);
        }
    }
}
