//! Software rasterizer
//!
//! Draws lit triangle meshes into an RGBA framebuffer with a z-buffer.
//! The arm scene and the prop are rendered here, then the framebuffer is
//! uploaded to a texture and blitted to the window.
//!
//! # Module Organization
//!
//! - `types` - Color, Vertex, Face, RasterSettings, RasterStats
//! - `math` - Vec3, Mat4 and transform helpers
//! - `camera` - Look-at camera and perspective projection
//! - `mesh` - Mesh and unit primitives
//! - `render` - Framebuffer and mesh rendering
//! - `draw` - 3D lines and the floor grid
//! - `constants` - Framebuffer resolution

pub mod camera;
pub mod constants;
pub mod draw;
pub mod math;
pub mod mesh;
pub mod render;
pub mod types;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use types::{Color, Face, RasterSettings, RasterStats, Vertex};

pub use math::{
    Vec3, Mat4,
    mat4_translation, mat4_scale,
    mat4_rotation_x, mat4_rotation_y, mat4_rotation_z,
    mat4_mul, mat4_chain,
    mat4_position, mat4_with_translation, mat4_from_position_rotation,
};

pub use camera::Camera;

pub use mesh::{Mesh, create_cylinder, create_sphere, create_plane};

pub use render::{Framebuffer, render_mesh};

pub use draw::{draw_floor_grid, GridStyle};

pub use constants::{WIDTH, HEIGHT};
