//! Core types for the rasterizer

use super::math::Vec3;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from normalized float channels (0.0-1.0)
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(r), q(g), q(b))
    }

    /// Multiply by a light intensity (clamped to 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Color::new(
            (self.r as f32 * i) as u8,
            (self.g as f32 * i) as u8,
            (self.b as f32 * i) as u8,
        )
    }

    /// RGBA bytes, always opaque
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

#[cfg(test)]
impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
}

/// Mesh vertex: object-space position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3) -> Self {
        Self { pos, normal }
    }
}

/// Triangle face referencing three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Lighting parameters shared by every draw in a pass
#[derive(Debug, Clone, Copy)]
pub struct RasterSettings {
    /// Direction the light travels (world space, normalized)
    pub light_dir: Vec3,
    /// Floor for the Lambert term
    pub ambient: f32,
    /// Shade both sides of a face (primitives and OBJ files wind inconsistently)
    pub two_sided: bool,
}

impl RasterSettings {
    /// Lambert intensity for a world-space normal
    pub fn intensity(&self, normal: Vec3) -> f32 {
        let d = normal.dot(-self.light_dir);
        let d = if self.two_sided { d.abs() } else { d.max(0.0) };
        self.ambient + (1.0 - self.ambient) * d
    }
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(-0.3, -1.0, -0.5).normalize(),
            ambient: 0.25,
            two_sided: true,
        }
    }
}

/// Per-draw statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterStats {
    pub triangles_drawn: u32,
    pub triangles_culled: u32,
}

impl RasterStats {
    pub fn accumulate(&mut self, other: &RasterStats) {
        self.triangles_drawn += other.triangles_drawn;
        self.triangles_culled += other.triangles_culled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_quantizes() {
        let c = Color::from_f32(0.0, 0.27, 0.47);
        assert_eq!(c, Color::new(0, 69, 120));
    }

    #[test]
    fn test_intensity_respects_ambient() {
        let s = RasterSettings {
            light_dir: Vec3::new(0.0, -1.0, 0.0),
            ambient: 0.2,
            two_sided: false,
        };
        assert!((s.intensity(Vec3::UP) - 1.0).abs() < 1e-6);
        assert!((s.intensity(-Vec3::UP) - 0.2).abs() < 1e-6);
    }
}
