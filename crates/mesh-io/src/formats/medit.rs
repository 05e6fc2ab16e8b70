//! Medit `.mesh`: keyword sections (`Vertices`, `Triangles`,
//! `Quadrilaterals`), each a count followed by that many rows, with
//! one-based vertex references. Quadrilaterals are fan-triangulated.

use std::io::BufRead;
use std::path::Path;

use super::{parse_float, parse_index, rebase_index, triangulate_fan};
use crate::error::MeshReadError;
use gravity_kernel::Vec3;

/// Reads the row count that follows a section keyword.
fn section_count<'a, I>(
    cursor: &mut I,
    path: &Path,
    keyword_line: usize,
) -> Result<usize, MeshReadError>
where
    I: Iterator<Item = &'a (usize, String)>,
{
    let (number, line) = cursor.next().ok_or_else(|| {
        MeshReadError::malformed(path, keyword_line, "section keyword without a count")
    })?;
    parse_index(line, path, *number)
}

pub(crate) fn parse<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
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

    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut cursor = lines.iter().peekable();

    while let Some((number, line)) = cursor.next() {
        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword.to_ascii_lowercase().as_str() {
            "meshversionformatted" | "dimension" => {
                // The value may sit on the same or the following line.
                if line.split_whitespace().nth(1).is_none() {
                    cursor.next();
                }
            }
            "vertices" => {
                let count = section_count(&mut cursor, path, *number)?;
                for _ in 0..count {
                    let (row_number, row) = cursor.next().ok_or_else(|| {
                        MeshReadError::malformed(path, *number, "truncated vertex section")
                    })?;
                    let tokens: Vec<&str> = row.split_whitespace().collect();
                    if tokens.len() < 3 {
                        return Err(MeshReadError::malformed(
                            path,
                            *row_number,
                            "vertex row too short",
                        ));
                    }
                    vertices.push(Vec3::new(
                        parse_float(tokens[0], path, *row_number)?,
                        parse_float(tokens[1], path, *row_number)?,
                        parse_float(tokens[2], path, *row_number)?,
                    ));
                }
            }
            "triangles" | "quadrilaterals" => {
                let arity = if keyword.eq_ignore_ascii_case("triangles") {
                    3
                } else {
                    4
                };
                let count = section_count(&mut cursor, path, *number)?;
                for _ in 0..count {
                    let (row_number, row) = cursor.next().ok_or_else(|| {
                        MeshReadError::malformed(path, *number, "truncated element section")
                    })?;
                    let tokens: Vec<&str> = row.split_whitespace().collect();
                    if tokens.len() < arity {
                        return Err(MeshReadError::malformed(
                            path,
                            *row_number,
                            "element row too short",
                        ));
                    }
                    let polygon = tokens[..arity]
                        .iter()
                        .map(|token| {
                            parse_index(token, path, *row_number)
                                .and_then(|raw| rebase_index(raw, 1, path, *row_number))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    triangulate_fan(&polygon, &mut faces);
                }
            }
            "end" => break,
            // Other sections (Edges, Tetrahedra, ...) follow the same
            // count-then-rows structure and are skipped wholesale.
            _ => {
                let skip = cursor
                    .peek()
                    .and_then(|(_, next_line)| next_line.parse::<usize>().ok());
                if let Some(count) = skip {
                    cursor.next();
                    for _ in 0..count {
                        cursor.next();
                    }
                }
            }
        }
    }

    Ok((vertices, faces))
}
