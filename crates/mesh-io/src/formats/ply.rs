//! Stanford PLY, ASCII flavour. The header is parsed for the vertex and
//! face element counts; binary PLY files are rejected with a clear error.

use std::io::BufRead;
use std::path::Path;

use super::{parse_float, parse_index, triangulate_fan};
use crate::error::MeshReadError;
use gravity_kernel::Vec3;

pub(crate) fn parse<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let mut lines = reader.lines().enumerate().map(|(number, line)| {
        line.map(|content| (number + 1, content))
            .map_err(|source| MeshReadError::Io {
                path: path.to_path_buf(),
                source,
            })
    });

    let (_, magic) = lines
        .next()
        .transpose()?
        .ok_or_else(|| MeshReadError::malformed(path, 1, "empty PLY file"))?;
    if magic.trim() != "ply" {
        return Err(MeshReadError::malformed(path, 1, "missing 'ply' magic line"));
    }

    let mut vertex_count: Option<usize> = None;
    let mut face_count: Option<usize> = None;
    let mut header_end = 1;
    // Elements appear in declaration order; vertex before face is the only
    // layout produced in the wild for plain geometry.
    loop {
        let (number, line) = lines
            .next()
            .transpose()?
            .ok_or_else(|| MeshReadError::malformed(path, header_end, "unterminated PLY header"))?;
        header_end = number;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["format", "ascii", _] => {}
            ["format", other, ..] => {
                return Err(MeshReadError::malformed(
                    path,
                    number,
                    format!("unsupported PLY format '{other}': only ascii is handled"),
                ));
            }
            ["element", "vertex", count] => vertex_count = Some(parse_index(count, path, number)?),
            ["element", "face", count] => face_count = Some(parse_index(count, path, number)?),
            ["end_header"] => break,
            _ => {}
        }
    }

    let vertex_count = vertex_count
        .ok_or_else(|| MeshReadError::malformed(path, header_end, "no vertex element declared"))?;
    let face_count = face_count
        .ok_or_else(|| MeshReadError::malformed(path, header_end, "no face element declared"))?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (number, line) = lines
            .next()
            .transpose()?
            .ok_or_else(|| MeshReadError::malformed(path, header_end, "truncated vertex list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(MeshReadError::malformed(path, number, "vertex row too short"));
        }
        vertices.push(Vec3::new(
            parse_float(tokens[0], path, number)?,
            parse_float(tokens[1], path, number)?,
            parse_float(tokens[2], path, number)?,
        ));
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (number, line) = lines
            .next()
            .transpose()?
            .ok_or_else(|| MeshReadError::malformed(path, header_end, "truncated face list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(MeshReadError::malformed(path, number, "empty face row"));
        }
        let arity = parse_index(tokens[0], path, number)?;
        if arity < 3 || tokens.len() < arity + 1 {
            return Err(MeshReadError::malformed(path, number, "facet row too short"));
        }
        let polygon = tokens[1..=arity]
            .iter()
            .map(|token| parse_index(token, path, number))
            .collect::<Result<Vec<_>, _>>()?;
        triangulate_fan(&polygon, &mut faces);
    }

    Ok((vertices, faces))
}
