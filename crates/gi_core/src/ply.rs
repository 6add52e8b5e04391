//! ASCII PLY mesh import.
//!
//! Handles the subset of PLY needed to bring scanned meshes into a scene:
//!
//! - `format ascii 1.0`
//! - a `vertex` element with `x`, `y`, `z` scalar properties (any extra
//!   properties such as `confidence` or `intensity` are skipped)
//! - a `face` element with a `vertex_indices` (or `vertex_index`) list property
//! - any other element, whose rows are skipped
//!
//! Binary PLY is rejected with [`PlyError::UnsupportedFormat`].

use std::collections::VecDeque;
use std::path::Path;

use gi_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur during PLY parsing.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a PLY file (missing 'ply' magic line)")]
    MissingMagic,

    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Result type for PLY operations.
pub type PlyResult<T> = Result<T, PlyError>;

/// A property declared in the header.
#[derive(Clone, Debug, PartialEq)]
enum Property {
    Scalar(String),
    List(String),
}

/// An element declared in the header.
#[derive(Clone, Debug)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

/// Load an ASCII PLY file from disk.
pub fn load_ply<P: AsRef<Path>>(path: P) -> PlyResult<Mesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_ply(&content)?;

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Parse ASCII PLY content into a triangle mesh.
pub fn parse_ply(content: &str) -> PlyResult<Mesh> {
    let mut lines: VecDeque<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, s)| (i + 1, s.trim()))
        .filter(|(_, s)| !s.is_empty())
        .collect();

    let elements = parse_header(&mut lines)?;

    let mut positions = Vec::new();
    let mut faces = Vec::new();

    for element in &elements {
        match element.name.as_str() {
            "vertex" => positions = parse_vertices(&mut lines, element)?,
            "face" => faces = parse_faces(&mut lines, element)?,
            _ => {
                log::debug!("Skipping {} '{}' rows", element.count, element.name);
                for _ in 0..element.count {
                    lines.pop_front().ok_or(PlyError::UnexpectedEof)?;
                }
            }
        }
    }

    for (face, indices) in faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(PlyError::IndexOutOfRange {
                face,
                index,
                vertex_count: positions.len(),
            });
        }
    }

    Ok(Mesh::from_polygons(positions, &faces))
}

fn parse_header(lines: &mut VecDeque<(usize, &str)>) -> PlyResult<Vec<Element>> {
    match lines.pop_front() {
        Some((_, "ply")) => {}
        _ => return Err(PlyError::MissingMagic),
    }

    let mut elements: Vec<Element> = Vec::new();

    loop {
        let (line_num, line) = lines.pop_front().ok_or(PlyError::UnexpectedEof)?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("end_header") => break,
            Some("comment") | Some("obj_info") => {}
            Some("format") => {
                let format = tokens.next().unwrap_or_default();
                if format != "ascii" {
                    return Err(PlyError::UnsupportedFormat(format.to_string()));
                }
            }
            Some("element") => {
                let name = tokens.next().ok_or_else(|| PlyError::Parse {
                    line: line_num,
                    message: "element without a name".to_string(),
                })?;
                let count = tokens
                    .next()
                    .ok_or_else(|| PlyError::Parse {
                        line: line_num,
                        message: format!("element '{}' without a count", name),
                    })
                    .and_then(|s| parse_usize(s))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements.last_mut().ok_or_else(|| PlyError::Parse {
                    line: line_num,
                    message: "property declared before any element".to_string(),
                })?;
                let tokens: Vec<&str> = tokens.collect();
                // property <type> <name> | property list <count type> <item type> <name>
                let property = match tokens.as_slice() {
                    ["list", _, _, name] => Property::List(name.to_string()),
                    [_, name] => Property::Scalar(name.to_string()),
                    _ => {
                        return Err(PlyError::Parse {
                            line: line_num,
                            message: format!("malformed property: {}", line),
                        })
                    }
                };
                element.properties.push(property);
            }
            Some(other) => {
                return Err(PlyError::Parse {
                    line: line_num,
                    message: format!("unexpected header keyword '{}'", other),
                })
            }
            None => {}
        }
    }

    Ok(elements)
}

fn parse_vertices(lines: &mut VecDeque<(usize, &str)>, element: &Element) -> PlyResult<Vec<Vec3>> {
    let column = |name: &'static str| {
        element
            .properties
            .iter()
            .position(|p| *p == Property::Scalar(name.to_string()))
            .ok_or(PlyError::MissingProperty(name))
    };
    let (xi, yi, zi) = (column("x")?, column("y")?, column("z")?);

    let mut positions = Vec::with_capacity(element.count.min(lines.len()));
    for _ in 0..element.count {
        let (line_num, line) = lines.pop_front().ok_or(PlyError::UnexpectedEof)?;
        let values: Vec<&str> = line.split_whitespace().collect();
        let value = |i: usize| -> PlyResult<f32> {
            let token = values.get(i).ok_or_else(|| PlyError::Parse {
                line: line_num,
                message: format!("expected at least {} values", i + 1),
            })?;
            token
                .parse::<f32>()
                .map_err(|_| PlyError::InvalidNumber(token.to_string()))
        };
        positions.push(Vec3::new(value(xi)?, value(yi)?, value(zi)?));
    }

    Ok(positions)
}

fn parse_faces(lines: &mut VecDeque<(usize, &str)>, element: &Element) -> PlyResult<Vec<Vec<u32>>> {
    let has_indices = element.properties.iter().any(|p| {
        matches!(p, Property::List(name) if name == "vertex_indices" || name == "vertex_index")
    });
    if !has_indices {
        return Err(PlyError::MissingProperty("vertex_indices"));
    }

    let mut faces = Vec::with_capacity(element.count.min(lines.len()));
    for _ in 0..element.count {
        let (line_num, line) = lines.pop_front().ok_or(PlyError::UnexpectedEof)?;
        let mut tokens = line.split_whitespace();
        let mut face = Vec::new();

        for property in &element.properties {
            match property {
                Property::Scalar(_) => {
                    tokens.next().ok_or_else(|| truncated_row(line_num))?;
                }
                Property::List(name) => {
                    let count = parse_usize(tokens.next().ok_or_else(|| truncated_row(line_num))?)?;
                    let is_indices = name == "vertex_indices" || name == "vertex_index";
                    for _ in 0..count {
                        let token = tokens.next().ok_or_else(|| truncated_row(line_num))?;
                        if is_indices {
                            let index = token
                                .parse::<u32>()
                                .map_err(|_| PlyError::InvalidNumber(token.to_string()))?;
                            face.push(index);
                        }
                    }
                }
            }
        }
        faces.push(face);
    }

    Ok(faces)
}

fn truncated_row(line: usize) -> PlyError {
    PlyError::Parse {
        line,
        message: "row ended before all properties were read".to_string(),
    }
}

fn parse_usize(token: &str) -> PlyResult<usize> {
    token
        .parse::<usize>()
        .map_err(|_| PlyError::InvalidNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "ply
format ascii 1.0
comment made by hand
element vertex 4
property float x
property float y
property float z
property float confidence
element face 4
property list uchar int vertex_indices
end_header
0 0 0 1
1 0 0 1
0 1 0 1
0 0 1 1
3 0 1 2
3 0 1 3
3 0 2 3
3 1 2 3
";

    #[test]
    fn test_parse_tetrahedron() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mesh = parse_ply(TETRAHEDRON).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.positions[3], Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(&mesh.indices[9..12], &[1, 2, 3]);
    }

    #[test]
    fn test_quad_faces_are_triangulated() {
        let content = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_index
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";
        let mesh = parse_ply(content).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_binary_format_rejected() {
        let content = "ply\nformat binary_little_endian 1.0\nend_header\n";
        assert!(matches!(
            parse_ply(content),
            Err(PlyError::UnsupportedFormat(f)) if f == "binary_little_endian"
        ));
    }

    #[test]
    fn test_oversized_element_count_is_truncation() {
        let content = "ply
format ascii 1.0
element vertex 100000000000000000
property float x
property float y
property float z
end_header
0 0 0
";
        assert!(matches!(parse_ply(content), Err(PlyError::UnexpectedEof)));

        let content = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 100000000000000000
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
";
        assert!(matches!(parse_ply(content), Err(PlyError::UnexpectedEof)));
    }

    #[test]
    fn test_missing_magic() {
        assert!(matches!(parse_ply("format ascii 1.0\n"), Err(PlyError::MissingMagic)));
    }

    #[test]
    fn test_truncated_body() {
        let content = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
end_header
0 0 0
1 0 0
";
        assert!(matches!(parse_ply(content), Err(PlyError::UnexpectedEof)));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let content = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 7
";
        assert!(matches!(
            parse_ply(content),
            Err(PlyError::IndexOutOfRange { face: 0, index: 7, vertex_count: 3 })
        ));
    }

    #[test]
    fn test_bad_number() {
        let content = "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
end_header
0 zero 0
";
        assert!(matches!(parse_ply(content), Err(PlyError::InvalidNumber(_))));
    }
}
