//! Geomview OFF: a counts line followed by vertex rows and polygonal
//! facet rows (zero-based references). Polygons are fan-triangulated.

use std::io::BufRead;
use std::path::Path;

use super::{parse_float, parse_index, triangulate_fan};
use crate::error::MeshReadError;
use gravity_kernel::Vec3;

/// Yields the meaningful lines of an OFF-style file: trimmed, non-empty,
/// comments stripped, paired with their one-based line numbers.
fn meaningful_lines<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<(usize, String)>, MeshReadError> {
    let mut lines = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MeshReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stripped = line.split('#').next().unwrap_or("").trim().to_string();
        if !stripped.is_empty() {
            lines.push((number + 1, stripped));
        }
    }
    Ok(lines)
}

pub(crate) fn parse<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let lines = meaningful_lines(reader, path)?;
    let mut cursor = lines.iter();

    let (first_number, first) = cursor
        .next()
        .ok_or_else(|| MeshReadError::malformed(path, 1, "empty OFF file"))?;
    // The header keyword may carry the counts on the same line.
    let mut counts_tokens: Vec<&str> = if let Some(rest) = first.strip_prefix("OFF") {
        rest.split_whitespace().collect()
    } else {
        return Err(MeshReadError::malformed(
            path,
            *first_number,
            "missing OFF header",
        ));
    };
    let mut counts_line = *first_number;
    if counts_tokens.is_empty() {
        let (number, line) = cursor
            .next()
            .ok_or_else(|| MeshReadError::malformed(path, *first_number, "missing counts line"))?;
        counts_line = *number;
        counts_tokens = line.split_whitespace().collect();
    }
    if counts_tokens.len() < 2 {
        return Err(MeshReadError::malformed(
            path,
            counts_line,
            "counts line must name vertices and faces",
        ));
    }
    let vertex_count = parse_index(counts_tokens[0], path, counts_line)?;
    let face_count = parse_index(counts_tokens[1], path, counts_line)?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (number, line) = cursor
            .next()
            .ok_or_else(|| MeshReadError::malformed(path, counts_line, "truncated vertex list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(MeshReadError::malformed(path, *number, "vertex row too short"));
        }
        vertices.push(Vec3::new(
            parse_float(tokens[0], path, *number)?,
            parse_float(tokens[1], path, *number)?,
            parse_float(tokens[2], path, *number)?,
        ));
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (number, line) = cursor
            .next()
            .ok_or_else(|| MeshReadError::malformed(path, counts_line, "truncated face list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let arity = parse_index(tokens[0], path, *number)?;
        if arity < 3 || tokens.len() < arity + 1 {
            return Err(MeshReadError::malformed(path, *number, "facet row too short"));
        }
        let polygon = tokens[1..=arity]
            .iter()
            .map(|token| parse_index(token, path, *number))
            .collect::<Result<Vec<_>, _>>()?;
        triangulate_fan(&polygon, &mut faces);
    }

    Ok((vertices, faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn parse_str(content: &str) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
        parse(Cursor::new(content), &PathBuf::from("test.off"))
    }

    #[test]
    fn test_tetrahedron() {
        let (vertices, faces) = parse_str(
            "OFF\n\
             # a tetrahedron\n\
             4 4 6\n\
             0 0 0\n\
             1 0 0\n\
             0 1 0\n\
             0 0 1\n\
             3 0 2 1\n\
             3 0 1 3\n\
             3 0 3 2\n\
             3 1 2 3\n",
        )
        .unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces.len(), 4);
        assert_eq!(faces[0], [0, 2, 1]);
    }

    #[test]
    fn test_counts_on_header_line_and_quads() {
        let (vertices, faces) = parse_str(
            "OFF 4 1 4\n\
             0 0 0\n\
             1 0 0\n\
             1 1 0\n\
             0 1 0\n\
             4 0 1 2 3\n",
        )
        .unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(matches!(
            parse_str("4 4 6\n0 0 0\n"),
            Err(MeshReadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        assert!(matches!(
            parse_str("OFF\n4 4 6\n0 0 0\n"),
            Err(MeshReadError::Malformed { .. })
        ));
    }
}
