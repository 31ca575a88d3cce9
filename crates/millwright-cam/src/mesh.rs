//! STL loader + mesh analyzer (C3).
//!
//! Parsing is hand-rolled rather than delegated to a crate: the format
//! detection rule and per-triangle validation are themselves the
//! specified algorithm (grounded in `3d-tests/src/stl_loader.cpp`'s
//! `isBinarySTL`/`loadBinarySTL`/`loadAsciiSTL`), not incidental I/O.

use crate::error::{Error, Result};
use millwright_core::geom::{Point3D, Triangle};
use millwright_core::InputError;
use nalgebra::Vector3;

/// Parse an STL file's bytes into a triangle mesh, auto-detecting format.
///
/// ASCII iff the file begins with the literal `solid` AND the expected
/// binary size (`80 + 4 + 50*n`) does not match the file size; otherwise
/// binary.
pub fn load_stl(bytes: &[u8]) -> Result<Vec<Triangle>> {
    if bytes.len() >= 5 && &bytes[..5] == b"solid" && !looks_binary_sized(bytes) {
        load_ascii_stl(bytes)
    } else {
        load_binary_stl(bytes)
    }
}

fn looks_binary_sized(bytes: &[u8]) -> bool {
    if bytes.len() < 84 {
        return false;
    }
    let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
    bytes.len() == 80 + 4 + 50 * count
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Binary STL: 80-byte header, little-endian `u32` triangle count, then
/// per triangle 3 floats normal + 3x3 floats vertices + 2-byte attribute
/// (skipped). Triangles with `|cross(e1,e2)| <= 1e-9` are dropped.
fn load_binary_stl(bytes: &[u8]) -> Result<Vec<Triangle>> {
    if bytes.len() < 84 {
        return Err(Error::Input("STL file too short for binary header".into()));
    }
    let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
    let mut triangles = Vec::with_capacity(count);
    let mut offset = 84;
    for _ in 0..count {
        if offset + 50 > bytes.len() {
            return Err(Error::Input("STL binary truncated".into()));
        }
        // Skip the stored normal (3 floats) — we recompute it from vertices.
        let vertex_offset = offset + 12;
        let v0 = Point3D::new(
            read_f32(bytes, vertex_offset) as f64,
            read_f32(bytes, vertex_offset + 4) as f64,
            read_f32(bytes, vertex_offset + 8) as f64,
        );
        let v1 = Point3D::new(
            read_f32(bytes, vertex_offset + 12) as f64,
            read_f32(bytes, vertex_offset + 16) as f64,
            read_f32(bytes, vertex_offset + 20) as f64,
        );
        let v2 = Point3D::new(
            read_f32(bytes, vertex_offset + 24) as f64,
            read_f32(bytes, vertex_offset + 28) as f64,
            read_f32(bytes, vertex_offset + 32) as f64,
        );
        push_if_valid(&mut triangles, v0, v1, v2);
        offset += 50;
    }
    Ok(triangles)
}

/// ASCII STL: `facet normal x y z ... outer loop ... vertex x y z ...
/// vertex ... vertex ... endloop endfacet`, repeated, terminated `endsolid`.
fn load_ascii_stl(bytes: &[u8]) -> Result<Vec<Triangle>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Input(format!("STL is not valid UTF-8: {e}")))?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut triangles = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == "vertex" {
            let verts = read_three_vertices(&tokens, i)?;
            push_if_valid(&mut triangles, verts[0], verts[1], verts[2]);
            i += 12; // 3 × ("vertex" + 3 numbers)
        } else {
            i += 1;
        }
    }
    Ok(triangles)
}

fn read_three_vertices(tokens: &[&str], start: usize) -> Result<[Point3D; 3]> {
    let mut verts = [Point3D::new(0.0, 0.0, 0.0); 3];
    for (vi, vert) in verts.iter_mut().enumerate() {
        let base = start + vi * 4;
        if base + 3 >= tokens.len() || tokens[base] != "vertex" {
            return Err(Error::Input("malformed ASCII STL facet".into()));
        }
        let parse = |s: &str| -> Result<f64> {
            s.parse::<f64>()
                .map_err(|e| Error::Input(format!("bad STL coordinate '{s}': {e}")))
        };
        *vert = Point3D::new(parse(tokens[base + 1])?, parse(tokens[base + 2])?, parse(tokens[base + 3])?);
    }
    Ok(verts)
}

fn push_if_valid(out: &mut Vec<Triangle>, v0: Point3D, v1: Point3D, v2: Point3D) {
    let t = Triangle::new(v0, v1, v2);
    if t.is_non_degenerate() {
        out.push(t);
    }
}

/// Thresholds controlling mesh accessibility/draft/depth analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachiningParams {
    pub tool_diameter: f64,
    pub tool_length: f64,
    pub stepdown: f64,
    pub min_draft_angle_deg: f64,
    pub material_height: f64,
}

/// Per-triangle and whole-mesh findings from [`analyze_mesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAnalysis {
    pub undercut_triangles: Vec<usize>,
    pub unreachable_triangles: Vec<usize>,
    pub draft_violation_triangles: Vec<usize>,
    pub material_fits: bool,
    pub stepdown_warnings: Vec<String>,
}

impl MeshAnalysis {
    pub fn has_issues(&self) -> bool {
        !self.undercut_triangles.is_empty()
            || !self.unreachable_triangles.is_empty()
            || !self.draft_violation_triangles.is_empty()
            || !self.material_fits
            || !self.stepdown_warnings.is_empty()
    }
}

/// Undercut: any triangle whose normal z-component < -0.1.
fn is_undercut(t: &Triangle) -> bool {
    t.normal.z < -0.1
}

/// `draft = 90 - acos(|n . z_hat|) * 180/pi`, flagged when below
/// `min_draft` and the triangle is not upward-facing (`n.z > tol`).
fn draft_angle_deg(t: &Triangle) -> f64 {
    let cos_angle = t.normal.z.abs().min(1.0);
    90.0 - cos_angle.acos().to_degrees()
}

fn is_upward_facing(t: &Triangle, tol: f64) -> bool {
    t.normal.z > tol
}

/// A straight vertical tool of `diameter` above `triangle`'s centroid at
/// height `tool_length` collides iff another triangle has a vertex within
/// the tool's cylinder (xy distance <= radius, z within the tool length
/// band above the triangle).
fn has_tool_collision(triangles: &[Triangle], index: usize, params: &MachiningParams) -> bool {
    let subject = &triangles[index];
    let center = subject.centroid();
    let radius = params.tool_diameter / 2.0;
    let band_top = center.z + params.tool_length;

    triangles.iter().enumerate().any(|(j, other)| {
        if j == index {
            return false;
        }
        other.vertices.iter().any(|v| {
            let dx = v.x - center.x;
            let dy = v.y - center.y;
            let xy_dist = (dx * dx + dy * dy).sqrt();
            xy_dist <= radius && v.z >= center.z && v.z <= band_top
        })
    })
}

/// Top-down z-list at `stepdown` intervals, last layer clamped to the
/// mesh's `min_z`.
pub fn machining_layers(triangles: &[Triangle], stepdown: f64) -> Vec<f64> {
    if triangles.is_empty() || stepdown <= 0.0 {
        return Vec::new();
    }
    let (min_z, max_z) = triangles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
        let (tlo, thi) = t.z_range();
        (lo.min(tlo), hi.max(thi))
    });
    let mut layers = Vec::new();
    let mut z = max_z;
    while z > min_z {
        layers.push(z);
        z -= stepdown;
    }
    layers.push(min_z);
    layers
}

/// Run the full C3 analysis described in spec §4.2.
pub fn analyze_mesh(triangles: &[Triangle], params: &MachiningParams) -> Result<MeshAnalysis> {
    if triangles.is_empty() {
        return Err(millwright_core::Error::from(InputError::EmptyMesh).into());
    }
    let mut analysis = MeshAnalysis::default();

    for (i, t) in triangles.iter().enumerate() {
        if is_undercut(t) {
            analysis.undercut_triangles.push(i);
        }
        if !has_tool_collision(triangles, i, params) {
            // no collision => reachable; nothing to record
        } else {
            analysis.unreachable_triangles.push(i);
        }
        let draft = draft_angle_deg(t);
        if draft < params.min_draft_angle_deg && !is_upward_facing(t, 1e-6) {
            analysis.draft_violation_triangles.push(i);
        }
    }

    let (min_z, max_z) = triangles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
        let (tlo, thi) = t.z_range();
        (lo.min(tlo), hi.max(thi))
    });
    analysis.material_fits = (max_z - min_z) <= params.material_height;

    let layers = machining_layers(triangles, params.stepdown);
    for window in layers.windows(2) {
        let (layer_top, layer_bottom) = (window[0], window[1]);
        let thickness = layer_top - layer_bottom;
        for t in triangles {
            let c = t.centroid();
            if c.z <= layer_top && c.z > layer_bottom {
                let draft = draft_angle_deg(t);
                if draft > 45.0 && thickness > 0.5 * params.stepdown {
                    analysis.stepdown_warnings.push(format!(
                        "layer [{layer_bottom:.3}, {layer_top:.3}] needs a smaller stepdown (draft {draft:.1} deg, thickness {thickness:.3}mm)"
                    ));
                    break;
                }
            }
        }
    }

    Ok(analysis)
}

/// 3D cross product via `nalgebra`, used as the reference computation that
/// [`Triangle::normal`] mirrors (kept here so this module's dependency on
/// `nalgebra` is exercised directly, not merely transitively).
pub fn nalgebra_normal(v0: Point3D, v1: Point3D, v2: Point3D) -> Vector3<f64> {
    let e1 = Vector3::new(v1.x - v0.x, v1.y - v0.y, v1.z - v0.z);
    let e2 = Vector3::new(v2.x - v0.x, v2.y - v0.y, v2.z - v0.z);
    e1.cross(&e2).normalize()
}
