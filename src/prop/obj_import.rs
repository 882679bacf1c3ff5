//! Wavefront OBJ import
//! Supports positions (v), normals (vn) and faces (f). Texture coordinates
//! are accepted in face references but not used. Corners without a normal get
//! one computed from the faces around them.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::rasterizer::{Face, Mesh, Vec3, Vertex};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("OBJ file has no faces")]
    Empty,
}

/// Missing normal index in the vertex cache key
const NO_NORMAL: usize = usize::MAX;

/// OBJ file importer
pub struct ObjImporter;

impl ObjImporter {
    pub fn load_from_file(path: &Path) -> Result<Mesh, ObjError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse OBJ file contents
    pub fn parse(contents: &str) -> Result<Mesh, ObjError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();

        let mut vertices: Vec<Vertex> = Vec::new();
        let mut faces: Vec<Face> = Vec::new();
        // Parallel to `vertices`: true where the file gave no normal
        let mut missing_normal: Vec<bool> = Vec::new();

        // (pos_idx, norm_idx) -> vertex_idx
        let mut vertex_cache: HashMap<(usize, usize), usize> = HashMap::new();

        for (line_idx, line) in contents.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_vec3(&parts, line_num, "vertex position")?),
                "vn" => normals.push(parse_vec3(&parts, line_num, "normal")?.normalize()),
                "f" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_num, "Face must have at least 3 vertices"));
                    }

                    let mut face_verts = Vec::with_capacity(parts.len() - 1);
                    for token in &parts[1..] {
                        let (pos_idx, norm_idx) = parse_face_vertex(token, line_num, positions.len(), normals.len())?;
                        let key = (pos_idx, norm_idx.unwrap_or(NO_NORMAL));
                        let vertex_idx = *vertex_cache.entry(key).or_insert_with(|| {
                            let normal = norm_idx.map(|n| normals[n]);
                            missing_normal.push(normal.is_none());
                            vertices.push(Vertex::new(positions[pos_idx], normal.unwrap_or(Vec3::ZERO)));
                            vertices.len() - 1
                        });
                        face_verts.push(vertex_idx);
                    }

                    // Fan triangulation from the first vertex
                    for i in 1..(face_verts.len() - 1) {
                        faces.push(Face::new(face_verts[0], face_verts[i], face_verts[i + 1]));
                    }
                }
                // o, g, s, usemtl, mtllib, vt, ...
                _ => {}
            }
        }

        if faces.is_empty() {
            return Err(ObjError::Empty);
        }

        let mut mesh = Mesh::from_parts(vertices, faces);
        if missing_normal.contains(&true) {
            mesh.compute_normals_for(&missing_normal);
        }
        Ok(mesh)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse { line, message: message.into() }
}

fn parse_vec3(parts: &[&str], line_num: usize, what: &str) -> Result<Vec3, ObjError> {
    if parts.len() < 4 {
        return Err(parse_error(line_num, format!("Invalid {} (expected 3 values)", what)));
    }
    Ok(Vec3::new(
        parse_float(parts[1], line_num)?,
        parse_float(parts[2], line_num)?,
        parse_float(parts[3], line_num)?,
    ))
}

fn parse_float(s: &str, line_num: usize) -> Result<f32, ObjError> {
    s.parse()
        .map_err(|_| parse_error(line_num, format!("Invalid float value '{}'", s)))
}

/// Parse a face vertex like "1", "1/2", "1//3" or "1/2/3" into
/// (position index, optional normal index), both zero-based
fn parse_face_vertex(
    token: &str,
    line_num: usize,
    position_count: usize,
    normal_count: usize,
) -> Result<(usize, Option<usize>), ObjError> {
    let mut fields = token.split('/');
    let pos = match fields.next() {
        Some(s) if !s.is_empty() => parse_index(s, position_count, line_num)?,
        _ => return Err(parse_error(line_num, "Missing position index in face")),
    };
    let _tex = fields.next();
    let normal = match fields.next() {
        Some(s) if !s.is_empty() => Some(parse_index(s, normal_count, line_num)?),
        _ => None,
    };
    Ok((pos, normal))
}

/// Parse a 1-based index; negative values count back from the end
fn parse_index(s: &str, count: usize, line_num: usize) -> Result<usize, ObjError> {
    let idx: i64 = s
        .parse()
        .map_err(|_| parse_error(line_num, format!("Invalid index '{}'", s)))?;

    let resolved = match idx {
        0 => return Err(parse_error(line_num, "Index cannot be 0")),
        i if i > 0 => i - 1,
        i => count as i64 + i,
    };

    if resolved < 0 || resolved >= count as i64 {
        return Err(parse_error(
            line_num,
            format!("Index {} out of range (have {} elements)", idx, count),
        ));
    }
    Ok(resolved as usize)
}
