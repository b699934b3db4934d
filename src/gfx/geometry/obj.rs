//! Minimal triangle-mesh text format
//!
//! Three record kinds are understood, everything else is skipped:
//!
//! ```text
//! v  x y z          vertex position
//! vn x y z          vertex normal
//! f  a//n b//n c//n triangle; a UV index (`a/t/n`) is accepted and ignored
//! ```
//!
//! Indices are 1-based and must refer to records that appear earlier in the
//! file. Faces are unpacked into a flat (position, normal) list in the order
//! their corners are written.

use super::MeshData;
use crate::error::{IndexKind, ParseError};

/// Parse mesh text into flat, non-indexed vertex arrays
pub fn parse_mesh(source: &str) -> Result<MeshData, ParseError> {
    let mut all_positions: Vec<[f32; 3]> = Vec::new();
    let mut all_normals: Vec<[f32; 3]> = Vec::new();
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for (line_index, raw) in source.lines().enumerate() {
        let line = line_index + 1;
        let mut tokens = raw.split_whitespace();

        match tokens.next() {
            Some("v") => all_positions.push(parse_triplet(line, "v", &mut tokens)?),
            Some("vn") => all_normals.push(parse_triplet(line, "vn", &mut tokens)?),
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() < 3 {
                    return Err(ParseError::MissingField { line, record: "f" });
                }
                if corners.len() > 3 {
                    return Err(ParseError::NonTriangularFace {
                        line,
                        count: corners.len(),
                    });
                }

                for corner in corners {
                    let (position_index, normal_index) = parse_corner(line, corner)?;
                    let position =
                        resolve(line, IndexKind::Position, position_index, &all_positions)?;
                    let normal = resolve(line, IndexKind::Normal, normal_index, &all_normals)?;
                    positions.push(position);
                    normals.push(normal);
                }
            }
            _ => {}
        }
    }

    Ok(MeshData {
        positions,
        uvs: None,
        normals: Some(normals),
    })
}

fn parse_triplet<'a>(
    line: usize,
    record: &'static str,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<[f32; 3], ParseError> {
    let mut values = [0.0f32; 3];
    for value in values.iter_mut() {
        let token = tokens
            .next()
            .ok_or(ParseError::MissingField { line, record })?;
        *value = token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(values)
}

/// Splits `a//n` or `a/t/n` into its position and normal indices
fn parse_corner(line: usize, token: &str) -> Result<(i64, i64), ParseError> {
    let malformed = || ParseError::MalformedFace {
        line,
        token: token.to_string(),
    };

    let mut parts = token.split('/');
    let position = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let _uv = parts.next().ok_or_else(malformed)?;
    let normal = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    let parse_index = |text: &str| {
        text.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            line,
            token: text.to_string(),
        })
    };
    Ok((parse_index(position)?, parse_index(normal)?))
}

fn resolve(
    line: usize,
    kind: IndexKind,
    index: i64,
    defined: &[[f32; 3]],
) -> Result<[f32; 3], ParseError> {
    let out_of_range = || ParseError::IndexOutOfRange {
        line,
        kind,
        index,
        available: defined.len(),
    };

    let zero_based = index
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(out_of_range)?;
    defined.get(zero_based).copied().ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";

    #[test]
    fn test_minimal_triangle() {
        let mesh = parse_mesh(TRIANGLE).unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 3);
        assert!(normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        assert!(mesh.uvs.is_none());
    }

    #[test]
    fn test_corner_order_is_preserved() {
        let source = TRIANGLE.replace("f 1//1 2//1 3//1", "f 3//1 1//1 2//1");
        let mesh = parse_mesh(&source).unwrap();
        assert_eq!(mesh.positions[0], [0.0, 1.0, 0.0]);
        assert_eq!(mesh.positions[1], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_uv_index_is_ignored() {
        let source = TRIANGLE.replace("f 1//1 2//1 3//1", "f 1/7/1 2/8/1 3/9/1");
        let mesh = parse_mesh(&source).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_unknown_records_are_skipped() {
        let source = format!("# comment\no thing\nvt 0.5 0.5\ns off\n\n{TRIANGLE}usemtl none\n");
        let mesh = parse_mesh(&source).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_position_index_out_of_range() {
        let source = TRIANGLE.replace("f 1//1 2//1 3//1", "f 1//1 2//1 4//1");
        let err = parse_mesh(&source).unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                line: 5,
                kind: IndexKind::Position,
                index: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn test_normal_index_out_of_range() {
        let source = TRIANGLE.replace("f 1//1 2//1 3//1", "f 1//1 2//2 3//1");
        let err = parse_mesh(&source).unwrap_err();
        assert!(matches!(
            err,
            ParseError::IndexOutOfRange {
                kind: IndexKind::Normal,
                index: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_face_before_vertices_is_rejected() {
        let source = "vn 0 0 1\nf 1//1 1//1 1//1\nv 0 0 0\n";
        assert!(matches!(
            parse_mesh(source),
            Err(ParseError::IndexOutOfRange { available: 0, .. })
        ));
    }

    #[test]
    fn test_zero_and_negative_indices_are_rejected() {
        for face in ["f 0//1 1//1 2//1", "f -1//1 1//1 2//1"] {
            let source = TRIANGLE.replace("f 1//1 2//1 3//1", face);
            assert!(matches!(
                parse_mesh(&source),
                Err(ParseError::IndexOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_most_negative_index_is_rejected() {
        let source = "v 0 0 0\nvn 0 0 1\nf -9223372036854775808//1 1//1 1//1\n";
        assert_eq!(
            parse_mesh(source).unwrap_err(),
            ParseError::IndexOutOfRange {
                line: 3,
                kind: IndexKind::Position,
                index: i64::MIN,
                available: 1,
            }
        );
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(
            parse_mesh("v 1 2\n").unwrap_err(),
            ParseError::MissingField { line: 1, record: "v" }
        );
        assert!(matches!(
            parse_mesh("v 1 two 3\n"),
            Err(ParseError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            parse_mesh("v 0 0 0\nf 1 1 1\n"),
            Err(ParseError::MalformedFace { line: 2, .. })
        ));
        assert!(matches!(
            parse_mesh(&format!("{TRIANGLE}f 1//1 2//1 3//1 1//1\n")),
            Err(ParseError::NonTriangularFace { line: 6, count: 4 })
        ));
    }

    #[test]
    fn test_bundled_model_parses() {
        let source = include_str!("../../../assets/octahedron.obj");
        let mesh = parse_mesh(source).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.is_consistent());
    }
}
