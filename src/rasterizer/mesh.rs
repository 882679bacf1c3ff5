//! Triangle meshes and unit primitives
//!
//! Primitives are built in a unit frame so a draw call's transform carries all
//! sizing: cylinders and cones span y in [-0.5, 0.5] with radius 0.5, the
//! sphere has radius 1, the plane lies in y = 0.

use std::f32::consts::PI;
use super::math::{mat4_normal_matrix, mat4_transform_dir, mat4_transform_point, Mat4, Vec3};
use super::types::{Face, Vertex};

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds (min, max); None for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.pos;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                Vec3::new(lo.x.min(v.pos.x), lo.y.min(v.pos.y), lo.z.min(v.pos.z)),
                Vec3::new(hi.x.max(v.pos.x), hi.y.max(v.pos.y), hi.z.max(v.pos.z)),
            )
        }))
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other.faces.iter().map(|f| Face::new(f.v0 + base, f.v1 + base, f.v2 + base)),
        );
    }

    /// Bake a transform into the vertices
    pub fn transform(&mut self, m: &Mat4) {
        let normal_matrix = mat4_normal_matrix(m);
        for v in &mut self.vertices {
            v.pos = mat4_transform_point(m, v.pos);
            v.normal = mat4_transform_dir(&normal_matrix, v.normal).normalize();
        }
    }

    /// Replace the normals of the vertices flagged in `selected` with
    /// area-weighted face normals. Unflagged vertices keep theirs.
    pub fn compute_normals_for(&mut self, selected: &[bool]) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for f in &self.faces {
            let a = self.vertices[f.v0].pos;
            let b = self.vertices[f.v1].pos;
            let c = self.vertices[f.v2].pos;
            let n = (b - a).cross(c - a);
            for i in [f.v0, f.v1, f.v2] {
                acc[i] = acc[i] + n;
            }
        }
        for ((v, n), &flagged) in self.vertices.iter_mut().zip(acc).zip(selected) {
            if flagged {
                v.normal = n.normalize();
            }
        }
    }
}

/// Capped cylinder (or cone when `top_radius` is 0) along Y
pub fn create_cylinder(bottom_radius: f32, top_radius: f32, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let step = 2.0 * PI / segments as f32;
    // Side normals tilt outward by the slope of the wall
    let slope = bottom_radius - top_radius;

    // Side: two rings
    for (h, r) in [(-0.5f32, bottom_radius), (0.5, top_radius)] {
        for j in 0..=segments {
            let (s, c) = (j as f32 * step).sin_cos();
            let normal = Vec3::new(s, slope, c).normalize();
            vertices.push(Vertex::new(Vec3::new(s * r, h, c * r), normal));
        }
    }
    let k2_start = segments + 1;
    for i in 0..segments {
        let k1 = i;
        let k2 = k2_start + i;
        faces.push(Face::new(k1, k1 + 1, k2));
        faces.push(Face::new(k2, k1 + 1, k2 + 1));
    }

    // Caps
    for (h, r, ny) in [(-0.5f32, bottom_radius, -1.0f32), (0.5, top_radius, 1.0)] {
        if r <= 0.0 {
            continue;
        }
        let normal = Vec3::new(0.0, ny, 0.0);
        let center = vertices.len();
        vertices.push(Vertex::new(Vec3::new(0.0, h, 0.0), normal));
        for j in 0..segments {
            let (s, c) = (j as f32 * step).sin_cos();
            vertices.push(Vertex::new(Vec3::new(s * r, h, c * r), normal));
        }
        for j in 0..segments {
            let a = center + 1 + j;
            let b = center + 1 + (j + 1) % segments;
            if ny < 0.0 {
                faces.push(Face::new(center, b, a));
            } else {
                faces.push(Face::new(center, a, b));
            }
        }
    }

    Mesh::from_parts(vertices, faces)
}

/// UV sphere of radius 1
pub fn create_sphere(segments: usize) -> Mesh {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for y in 0..=segments {
        let v = y as f32 / segments as f32;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let pos = Vec3::new(
                (u * 2.0 * PI).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            vertices.push(Vertex::new(pos, pos));
        }
    }

    let row = segments + 1;
    for y in 0..segments {
        for x in 0..segments {
            let a = y * row + x;
            let b = (y + 1) * row + x;
            faces.push(Face::new(a, b, a + 1));
            faces.push(Face::new(a + 1, b, b + 1));
        }
    }

    Mesh::from_parts(vertices, faces)
}

/// Square in the XZ plane, `half_extent` on each side of the origin, split
/// into `cells` x `cells` quads so near-plane rejection stays local
pub fn create_plane(half_extent: f32, cells: usize) -> Mesh {
    let cells = cells.max(1);
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let size = 2.0 * half_extent / cells as f32;

    for z in 0..=cells {
        for x in 0..=cells {
            let pos = Vec3::new(-half_extent + x as f32 * size, 0.0, -half_extent + z as f32 * size);
            vertices.push(Vertex::new(pos, Vec3::UP));
        }
    }

    let row = cells + 1;
    for z in 0..cells {
        for x in 0..cells {
            let a = z * row + x;
            let b = a + row;
            faces.push(Face::new(a, b, a + 1));
            faces.push(Face::new(a + 1, b, b + 1));
        }
    }

    Mesh::from_parts(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::mat4_scale;

    #[test]
    fn test_cylinder_spans_unit_height() {
        let m = create_cylinder(0.5, 0.5, 16);
        let (lo, hi) = m.bounds().unwrap();
        assert!((lo.y + 0.5).abs() < 1e-6 && (hi.y - 0.5).abs() < 1e-6);
        assert!((hi.x - 0.5).abs() < 1e-3);
        // 2 per side quad + 1 per cap wedge
        assert_eq!(m.triangle_count(), 16 * 2 + 16 * 2);
    }

    #[test]
    fn test_cone_has_single_cap() {
        let m = create_cylinder(0.5, 0.0, 8);
        assert_eq!(m.triangle_count(), 8 * 2 + 8);
    }

    #[test]
    fn test_sphere_is_unit() {
        let m = create_sphere(12);
        assert!(m.vertices.iter().all(|v| (v.pos.len() - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = create_plane(1.0, 1);
        let b = create_plane(1.0, 1);
        a.merge(&b);
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(a.faces[2], Face::new(4, 6, 5));
    }

    #[test]
    fn test_scaled_cone_normals_stay_perpendicular_to_wall() {
        let segments = 16;
        let mut cone = create_cylinder(0.5, 0.0, segments);
        cone.transform(&mat4_scale(Vec3::new(0.05, 0.25, 0.05)));

        // Bottom ring vertex j and top ring vertex j bound the same wall line
        for j in 0..segments {
            let bottom = cone.vertices[j];
            let top = cone.vertices[segments + 1 + j];
            let wall = (top.pos - bottom.pos).normalize();
            assert!(bottom.normal.dot(wall).abs() < 1e-4, "segment {}", j);
            assert!((bottom.normal.len() - 1.0).abs() < 1e-5);
        }

        // Straight-on wall normal of the thin cone is nearly horizontal
        let n = cone.vertices[0].normal;
        assert!((n.y - 0.0995).abs() < 1e-3);
        assert!((n.z - 0.995).abs() < 1e-3);
    }
}
