//! Software rasterizer backend for scene draws

use crate::rasterizer::{
    Camera, Framebuffer, GridStyle, Mat4, Mesh, RasterSettings, RasterStats,
    create_cylinder, create_plane, create_sphere, draw_floor_grid, render_mesh,
};
use super::{DrawSink, Material, Shape, Shading};

/// Meshes referenced by `Shape`, built once at startup
pub struct SceneMeshes {
    pub cylinder: Mesh,
    pub cone: Mesh,
    pub sphere: Mesh,
    pub plane: Mesh,
    pub prop: Mesh,
}

impl SceneMeshes {
    pub fn new(prop: Mesh) -> Self {
        Self {
            cylinder: create_cylinder(0.5, 0.5, 16),
            cone: create_cylinder(0.5, 0.0, 16),
            sphere: create_sphere(10),
            // Subdivided so near-plane rejection drops small pieces, not the whole floor
            plane: create_plane(1.0, 16),
            prop,
        }
    }

    pub fn get(&self, shape: Shape) -> &Mesh {
        match shape {
            Shape::Cylinder => &self.cylinder,
            Shape::Cone => &self.cone,
            Shape::Sphere => &self.sphere,
            Shape::Plane => &self.plane,
            Shape::Prop => &self.prop,
        }
    }
}

/// Draws into a framebuffer for one frame
pub struct FramebufferSink<'a> {
    fb: &'a mut Framebuffer,
    camera: &'a Camera,
    meshes: &'a SceneMeshes,
    shading: Shading,
    lit: RasterSettings,
    grid: GridStyle,
    stats: RasterStats,
}

impl<'a> FramebufferSink<'a> {
    pub fn new(fb: &'a mut Framebuffer, camera: &'a Camera, meshes: &'a SceneMeshes) -> Self {
        Self {
            fb,
            camera,
            meshes,
            shading: Shading::Lit,
            lit: RasterSettings::default(),
            grid: GridStyle::default(),
            stats: RasterStats::default(),
        }
    }

    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    fn settings(&self) -> RasterSettings {
        match self.shading {
            Shading::Lit => self.lit,
            Shading::Floor => RasterSettings { ambient: 1.0, ..self.lit },
        }
    }
}

impl DrawSink for FramebufferSink<'_> {
    fn set_shading(&mut self, shading: Shading) {
        self.shading = shading;
    }

    fn draw(&mut self, transform: &Mat4, material: Material, shape: Shape) {
        let settings = self.settings();
        let stats = render_mesh(
            self.fb,
            self.meshes.get(shape),
            transform,
            material.color(),
            self.camera,
            &settings,
        );
        self.stats.accumulate(&stats);

        if self.shading == Shading::Floor {
            draw_floor_grid(self.fb, self.camera, &self.grid);
        }
    }
}
