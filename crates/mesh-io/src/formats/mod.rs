//! Per-format mesh parsers. Every parser works on a `BufRead` so the unit
//! tests can feed in-memory fixtures; the path parameter only serves error
//! reporting.

pub mod medit;
pub mod node_face;
pub mod obj;
pub mod off;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::MeshReadError;

/// Splits a polygonal facet into a triangle fan anchored at its first
/// vertex. The facet must have at least three vertices.
pub(crate) fn triangulate_fan(polygon: &[usize], faces: &mut Vec<[usize; 3]>) {
    for window in polygon[1..].windows(2) {
        faces.push([polygon[0], window[0], window[1]]);
    }
}

/// Parses one whitespace-separated token as `f64` with location context.
pub(crate) fn parse_float(
    token: &str,
    path: &Path,
    line: usize,
) -> Result<f64, MeshReadError> {
    token
        .parse::<f64>()
        .map_err(|_| MeshReadError::malformed(path, line, format!("invalid number '{token}'")))
}

/// Parses one whitespace-separated token as `usize` with location context.
pub(crate) fn parse_index(
    token: &str,
    path: &Path,
    line: usize,
) -> Result<usize, MeshReadError> {
    token
        .parse::<usize>()
        .map_err(|_| MeshReadError::malformed(path, line, format!("invalid index '{token}'")))
}

/// Shifts a raw vertex reference into zero-based indexing.
pub(crate) fn rebase_index(
    raw: usize,
    base: usize,
    path: &Path,
    line: usize,
) -> Result<usize, MeshReadError> {
    raw.checked_sub(base).ok_or_else(|| {
        MeshReadError::malformed(
            path,
            line,
            format!("vertex reference {raw} below the file's index base {base}"),
        )
    })
}
