//! The grabbable prop's geometry
//!
//! Loaded from an OBJ file when one is configured, otherwise (or when loading
//! fails) a procedural pot of roughly teapot proportions is used. Model units
//! match a classic teapot: about three units wide, resting on y = 0.

pub mod obj_import;

use std::path::Path;

use crate::rasterizer::{
    Mesh, Vec3, create_cylinder, create_sphere, mat4_chain, mat4_rotation_z, mat4_scale, mat4_translation,
};

pub use obj_import::{ObjError, ObjImporter};

#[derive(Debug, Clone)]
pub struct PropModel {
    pub mesh: Mesh,
}

impl PropModel {
    pub fn load(path: &Path) -> Result<Self, ObjError> {
        let mesh = ObjImporter::load_from_file(path)?;
        log::info!("Loaded prop {} ({} triangles)", path.display(), mesh.triangle_count());
        if let Some((lo, hi)) = mesh.bounds() {
            log::debug!(
                "Prop bounds ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            );
        }
        Ok(Self { mesh })
    }

    /// Load the configured model, falling back to the stand-in on any failure
    pub fn load_or_stand_in(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                log::warn!("Could not load prop {}: {}; using stand-in pot", path.display(), e);
                Self::stand_in()
            }),
            None => Self::stand_in(),
        }
    }

    pub fn stand_in() -> Self {
        Self { mesh: stand_in_pot() }
    }
}

/// Body, lid, knob and spout built from unit primitives
fn stand_in_pot() -> Mesh {
    let mut pot = Mesh::default();

    let mut body = create_sphere(12);
    body.transform(&mat4_chain(&[
        mat4_translation(Vec3::new(0.0, 0.8, 0.0)),
        mat4_scale(Vec3::new(1.4, 0.8, 1.4)),
    ]));
    pot.merge(&body);

    let mut lid = create_cylinder(0.5, 0.3, 12);
    lid.transform(&mat4_chain(&[
        mat4_translation(Vec3::new(0.0, 1.65, 0.0)),
        mat4_scale(Vec3::new(1.6, 0.2, 1.6)),
    ]));
    pot.merge(&lid);

    let mut knob = create_sphere(6);
    knob.transform(&mat4_chain(&[
        mat4_translation(Vec3::new(0.0, 1.85, 0.0)),
        mat4_scale(Vec3::new(0.15, 0.15, 0.15)),
    ]));
    pot.merge(&knob);

    let mut spout = create_cylinder(0.5, 0.2, 8);
    spout.transform(&mat4_chain(&[
        mat4_translation(Vec3::new(1.6, 1.0, 0.0)),
        mat4_rotation_z(-50.0),
        mat4_scale(Vec3::new(0.35, 1.0, 0.35)),
    ]));
    pot.merge(&spout);

    pot
}
