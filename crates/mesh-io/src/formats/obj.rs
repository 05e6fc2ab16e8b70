//! Wavefront OBJ (and the `.tab` variant using the same `v`/`f` lines).
//! Only vertex and face statements are interpreted; everything else
//! (normals, texture coordinates, groups, materials) is skipped.

use std::io::BufRead;
use std::path::Path;

use super::{parse_float, rebase_index, triangulate_fan};
use crate::error::MeshReadError;
use gravity_kernel::Vec3;

pub(crate) fn parse<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let number = number + 1;
        let line = line.map_err(|source| MeshReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coordinate = |axis: &str| {
                    tokens
                        .next()
                        .ok_or_else(|| {
                            MeshReadError::malformed(
                                path,
                                number,
                                format!("vertex line missing {axis} coordinate"),
                            )
                        })
                        .and_then(|token| parse_float(token, path, number))
                };
                let x = coordinate("x")?;
                let y = coordinate("y")?;
                let z = coordinate("z")?;
                vertices.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let mut polygon = Vec::new();
                for token in tokens {
                    // "f 1/4/2" style references: only the vertex index counts.
                    let vertex_token = token.split('/').next().unwrap_or(token);
                    let raw = vertex_token.parse::<usize>().map_err(|_| {
                        MeshReadError::malformed(
                            path,
                            number,
                            format!("invalid face reference '{token}'"),
                        )
                    })?;
                    polygon.push(rebase_index(raw, 1, path, number)?);
                }
                if polygon.len() < 3 {
                    return Err(MeshReadError::malformed(
                        path,
                        number,
                        "face with fewer than three vertices",
                    ));
                }
                triangulate_fan(&polygon, &mut faces);
            }
            _ => {}
        }
    }

    Ok((vertices, faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn parse_str(content: &str) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
        parse(Cursor::new(content), &PathBuf::from("test.obj"))
    }

    #[test]
    fn test_vertices_and_triangles() {
        let (vertices, faces) = parse_str(
            "# comment\n\
             v 0.0 0.0 0.0\n\
             v 1.0 0.0 0.0\n\
             v 0.0 1.0 0.0\n\
             f 1 2 3\n",
        )
        .unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_slash_references_and_quad() {
        let (_, faces) = parse_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1/1/1 2/2/2 3/3/3 4/4/4\n",
        )
        .unwrap();
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_zero_index_rejected() {
        let result = parse_str("v 0 0 0\nf 0 1 2\n");
        assert!(matches!(result, Err(MeshReadError::Malformed { line: 2, .. })));
    }

    #[test]
    fn test_bad_number_rejected() {
        let result = parse_str("v 0 zero 0\n");
        assert!(matches!(result, Err(MeshReadError::Malformed { line: 1, .. })));
    }
}
