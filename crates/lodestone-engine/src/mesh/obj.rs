//! Wavefront OBJ parsing.
//!
//! Grammar subset:
//! - `v x y z [r g b]`: position, with the common vertex-color extension
//! - `vn x y z`: normal
//! - `vt ...`: parsed over, unused
//! - `f` with `v`, `v/vt`, `v//vn` and `v/vt/vn` references, 1-based or
//!   negative (relative) indices, polygons fan-triangulated
//! - `#` comments and unknown keywords (`o`, `g`, `s`, `usemtl`, ...) ignored
//!
//! Source data is Y-up; output is remapped to the renderer's Z-up convention:
//! `(x, y, z) -> (x, -z, y)`, normals included. Corners without a normal get
//! the containing triangle's face normal; vertices without a color get white.

use std::fs;
use std::path::Path;

use glam::Vec3;

use super::{MeshError, Vertex};

/// Reads and parses an OBJ file into the flat vertex array the pipeline
/// uploads verbatim.
pub fn load_obj(path: &Path) -> Result<Vec<Vertex>, MeshError> {
    let text = fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let vertices = parse_obj(&text)?;
    log::debug!("loaded {} vertices from {}", vertices.len(), path.display());
    Ok(vertices)
}

/// Parses OBJ text. See the module docs for the accepted grammar.
pub fn parse_obj(text: &str) -> Result<Vec<Vertex>, MeshError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut colors: Vec<[f32; 3]> = Vec::new(); // parallel to `positions`
    let mut normals: Vec<Vec3> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or("");
        let rest: Vec<&str> = fields.collect();

        match keyword {
            "v" => {
                let floats = parse_floats(&rest, line_no)?;
                if floats.len() < 3 {
                    return Err(err(line_no, "vertex needs at least 3 coordinates"));
                }
                positions.push(Vec3::new(floats[0], floats[1], floats[2]));
                // `v x y z r g b` carries a per-vertex color.
                if floats.len() >= 6 {
                    colors.push([floats[3], floats[4], floats[5]]);
                } else {
                    colors.push([1.0, 1.0, 1.0]);
                }
            }
            "vn" => {
                let floats = parse_floats(&rest, line_no)?;
                if floats.len() != 3 {
                    return Err(err(line_no, "normal needs exactly 3 components"));
                }
                normals.push(Vec3::new(floats[0], floats[1], floats[2]));
            }
            "f" => {
                if rest.len() < 3 {
                    return Err(err(line_no, "face needs at least 3 vertices"));
                }

                let corners: Vec<Corner> = rest
                    .iter()
                    .map(|r| parse_corner(r, positions.len(), normals.len(), line_no))
                    .collect::<Result<_, _>>()?;

                // Fan triangulation around the first corner.
                for i in 1..corners.len() - 1 {
                    emit_triangle(
                        [&corners[0], &corners[i], &corners[i + 1]],
                        &positions,
                        &colors,
                        &normals,
                        &mut vertices,
                    );
                }
            }
            // Texture coordinates, object/group/material structure and
            // smoothing groups do not affect the vertex stream.
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(MeshError::NoGeometry);
    }

    Ok(vertices)
}

/// One face corner: resolved position index plus optional normal index.
struct Corner {
    position: usize,
    normal: Option<usize>,
}

/// Y-up source space to the renderer's Z-up space.
fn remap(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

fn emit_triangle(
    corners: [&Corner; 3],
    positions: &[Vec3],
    colors: &[[f32; 3]],
    normals: &[Vec3],
    out: &mut Vec<Vertex>,
) {
    let p: [Vec3; 3] = [
        remap(positions[corners[0].position]),
        remap(positions[corners[1].position]),
        remap(positions[corners[2].position]),
    ];

    // Fallback for corners without an explicit normal.
    let face_normal = {
        let n = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();
        if n == Vec3::ZERO { Vec3::Z } else { n }
    };

    for (corner, position) in corners.into_iter().zip(p) {
        let normal = match corner.normal {
            Some(ni) => remap(normals[ni]).normalize_or_zero(),
            None => face_normal,
        };
        out.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            color: colors[corner.position],
        });
    }
}

fn parse_floats(fields: &[&str], line_no: usize) -> Result<Vec<f32>, MeshError> {
    fields
        .iter()
        .map(|f| {
            f.parse::<f32>()
                .map_err(|_| err(line_no, format!("invalid number `{f}`")))
        })
        .collect()
}

/// Parses one face reference (`a`, `a/b`, `a//c`, `a/b/c`) and resolves its
/// indices against the counts seen so far.
fn parse_corner(
    reference: &str,
    position_count: usize,
    normal_count: usize,
    line_no: usize,
) -> Result<Corner, MeshError> {
    let mut parts = reference.split('/');

    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, position_count, line_no)?,
        _ => return Err(err(line_no, format!("face reference `{reference}` lacks a vertex index"))),
    };

    let _texcoord = parts.next(); // unused

    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, normal_count, line_no)?),
        _ => None,
    };

    Ok(Corner { position, normal })
}

/// OBJ indices are 1-based; negative values count back from the end of the
/// list parsed so far.
fn resolve_index(token: &str, count: usize, line_no: usize) -> Result<usize, MeshError> {
    let value: i64 = token
        .parse()
        .map_err(|_| err(line_no, format!("invalid index `{token}`")))?;

    let resolved = if value > 0 {
        value - 1
    } else if value < 0 {
        count as i64 + value
    } else {
        return Err(err(line_no, "index 0 is not valid in OBJ"));
    };

    if resolved < 0 || resolved as usize >= count {
        return Err(err(
            line_no,
            format!("index {value} out of range (have {count})"),
        ));
    }

    Ok(resolved as usize)
}

fn err(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::Parse {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# a single triangle with colors and normals
v 0.0 0.0 0.0 1.0 0.0 0.0
v 1.0 0.0 0.0 0.0 1.0 0.0
v 0.0 1.0 0.0 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1
";

    #[test]
    fn triangle_parses_to_three_vertices() {
        let verts = parse_obj(TRIANGLE).unwrap();
        assert_eq!(verts.len(), 3);
    }

    #[test]
    fn positions_are_axis_remapped() {
        let verts = parse_obj("v 1.0 2.0 3.0\nv 0 0 0\nv 0 0 0\nf 1 2 3\n").unwrap();
        // (x, y, z) -> (x, -z, y)
        assert_eq!(verts[0].position, [1.0, -3.0, 2.0]);
    }

    #[test]
    fn normals_are_axis_remapped() {
        let verts = parse_obj(TRIANGLE).unwrap();
        // source +Z -> renderer -Y
        assert_eq!(verts[0].normal, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn vertex_colors_are_carried_through() {
        let verts = parse_obj(TRIANGLE).unwrap();
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(verts[2].color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_colors_default_to_white() {
        let verts = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(verts[0].color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_normals_use_the_face_normal() {
        let verts = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        // Triangle lies in the remapped XZ plane; its face normal is -Y.
        for v in &verts {
            assert_eq!(v.normal, [0.0, -1.0, 0.0]);
        }
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let verts = parse_obj(obj).unwrap();
        assert_eq!(verts.len(), 6);
        // Second triangle shares the fan pivot.
        assert_eq!(verts[0].position, verts[3].position);
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let verts = parse_obj(obj).unwrap();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn slash_forms_are_accepted() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 1 0\nf 1/1/1 2/1/1 3//1\n";
        let verts = parse_obj(obj).unwrap();
        // source +Y -> renderer +Z
        assert_eq!(verts[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn malformed_number_reports_line() {
        let obj = "v 0 0 0\nv nope 0 0\n";
        match parse_obj(obj) {
            Err(MeshError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn zero_index_is_rejected() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(parse_obj(obj), Err(MeshError::Parse { line: 4, .. })));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let obj = "v 0 0 0\nf 1 2 3\n";
        assert!(matches!(parse_obj(obj), Err(MeshError::Parse { .. })));
    }

    #[test]
    fn file_without_faces_has_no_geometry() {
        assert!(matches!(parse_obj("v 0 0 0\nv 1 0 0\n"), Err(MeshError::NoGeometry)));
        assert!(matches!(parse_obj(""), Err(MeshError::NoGeometry)));
    }

    #[test]
    fn comments_and_unknown_keywords_are_ignored() {
        let obj = "\
# header comment
o thing
s off
usemtl none
v 0 0 0 # trailing comment
v 1 0 0
v 0 1 0
f 1 2 3
";
        assert_eq!(parse_obj(obj).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_reports_io_error_with_path() {
        let path = Path::new("/nonexistent/lodestone-test.obj");
        match load_obj(path) {
            Err(MeshError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
