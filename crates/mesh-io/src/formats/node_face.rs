//! TetGen's `.node`/`.face` pair. The `.node` file carries a header
//! `<count> <dimension> <attributes> <markers>` and one row per point
//! (`<index> <x> <y> <z> ...`); the `.face` file carries `<count>
//! <markers>` and one row per triangle. Whether the file counts from zero
//! or one is read off the first data row, as TetGen allows both.

use std::io::BufRead;
use std::path::Path;

use super::{parse_float, parse_index, rebase_index};
use crate::error::MeshReadError;
use gravity_kernel::Vec3;

fn data_lines<R: BufRead>(reader: R, path: &Path) -> Result<Vec<(usize, String)>, MeshReadError> {
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

/// Parses a `.node` file into vertices plus the detected index base.
pub(crate) fn parse_nodes<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, usize), MeshReadError> {
    let lines = data_lines(reader, path)?;
    let mut cursor = lines.iter();

    let (header_number, header) = cursor
        .next()
        .ok_or_else(|| MeshReadError::malformed(path, 1, "empty .node file"))?;
    let header_tokens: Vec<&str> = header.split_whitespace().collect();
    let count = parse_index(header_tokens[0], path, *header_number)?;
    if let Some(dimension) = header_tokens.get(1) {
        if *dimension != "3" {
            return Err(MeshReadError::malformed(
                path,
                *header_number,
                format!("dimension {dimension} is not supported, points must be 3-D"),
            ));
        }
    }

    let mut base = 0;
    let mut vertices = Vec::with_capacity(count);
    for row in 0..count {
        let (number, line) = cursor
            .next()
            .ok_or_else(|| MeshReadError::malformed(path, *header_number, "truncated point list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(MeshReadError::malformed(path, *number, "point row too short"));
        }
        let index = parse_index(tokens[0], path, *number)?;
        if row == 0 {
            base = index;
            if base > 1 {
                return Err(MeshReadError::malformed(
                    path,
                    *number,
                    format!("point numbering starts at {base}, expected 0 or 1"),
                ));
            }
        }
        vertices.push(Vec3::new(
            parse_float(tokens[1], path, *number)?,
            parse_float(tokens[2], path, *number)?,
            parse_float(tokens[3], path, *number)?,
        ));
    }

    Ok((vertices, base))
}

/// Parses a `.face` file, shifting every reference by the `.node` file's
/// index base.
pub(crate) fn parse_faces<R: BufRead>(
    reader: R,
    path: &Path,
    base: usize,
) -> Result<Vec<[usize; 3]>, MeshReadError> {
    let lines = data_lines(reader, path)?;
    let mut cursor = lines.iter();

    let (header_number, header) = cursor
        .next()
        .ok_or_else(|| MeshReadError::malformed(path, 1, "empty .face file"))?;
    let count = parse_index(
        header.split_whitespace().next().unwrap_or(""),
        path,
        *header_number,
    )?;

    let mut faces = Vec::with_capacity(count);
    for _ in 0..count {
        let (number, line) = cursor
            .next()
            .ok_or_else(|| MeshReadError::malformed(path, *header_number, "truncated face list"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(MeshReadError::malformed(path, *number, "face row too short"));
        }
        let mut face = [0usize; 3];
        for (slot, token) in face.iter_mut().zip(&tokens[1..4]) {
            let raw = parse_index(token, path, *number)?;
            *slot = rebase_index(raw, base, path, *number)?;
        }
        faces.push(face);
    }

    Ok(faces)
}
