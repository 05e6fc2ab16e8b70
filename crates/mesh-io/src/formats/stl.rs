//! Stereolithography STL, both flavours. ASCII files list `vertex` rows
//! inside facet blocks; binary files carry an 80-byte header, a
//! little-endian u32 triangle count and 50-byte records (normal, three
//! vertices, attribute count). STL stores no shared topology, so equal
//! vertex coordinates (by exact bit pattern) are merged back into shared
//! indices.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::MeshReadError;
use gravity_kernel::Vec3;

use super::parse_float;

/// Rebuilds shared vertex indices from per-triangle corner coordinates.
#[derive(Default)]
struct VertexPool {
    vertices: Vec<Vec3>,
    seen: HashMap<[u64; 3], usize>,
}

impl VertexPool {
    fn intern(&mut self, vertex: Vec3) -> usize {
        let key = [vertex.x.to_bits(), vertex.y.to_bits(), vertex.z.to_bits()];
        *self.seen.entry(key).or_insert_with(|| {
            self.vertices.push(vertex);
            self.vertices.len() - 1
        })
    }
}

pub(crate) fn parse<R: BufRead>(
    mut reader: R,
    path: &Path,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| MeshReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    // "solid" openers exist in sloppy binary files too; a genuine ASCII
    // body must also decode as text and mention a facet keyword.
    if bytes.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            if text.contains("facet") {
                return parse_ascii(text, path);
            }
        }
    }
    parse_binary(&bytes, path)
}

fn parse_ascii(text: &str, path: &Path) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let mut pool = VertexPool::default();
    let mut faces = Vec::new();
    let mut corners: Vec<usize> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let number = number + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            Some(&"vertex") => {
                if tokens.len() < 4 {
                    return Err(MeshReadError::malformed(path, number, "vertex row too short"));
                }
                let vertex = Vec3::new(
                    parse_float(tokens[1], path, number)?,
                    parse_float(tokens[2], path, number)?,
                    parse_float(tokens[3], path, number)?,
                );
                corners.push(pool.intern(vertex));
            }
            Some(&"endloop") => {
                if corners.len() != 3 {
                    return Err(MeshReadError::malformed(
                        path,
                        number,
                        format!("facet loop with {} vertices instead of 3", corners.len()),
                    ));
                }
                faces.push([corners[0], corners[1], corners[2]]);
                corners.clear();
            }
            _ => {}
        }
    }

    Ok((pool.vertices, faces))
}

fn parse_binary(bytes: &[u8], path: &Path) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    if bytes.len() < 84 {
        return Err(MeshReadError::malformed(
            path,
            0,
            "binary STL shorter than its 84-byte preamble",
        ));
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let expected = 84 + count * 50;
    if bytes.len() < expected {
        return Err(MeshReadError::malformed(
            path,
            0,
            format!(
                "binary STL truncated: {} bytes for {count} triangles, expected {expected}",
                bytes.len()
            ),
        ));
    }

    let read_f32 = |offset: usize| {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as f64
    };

    let mut pool = VertexPool::default();
    let mut faces = Vec::with_capacity(count);
    for triangle in 0..count {
        // Skip the 12-byte stored normal; the vertex winding defines it.
        let record = 84 + triangle * 50 + 12;
        let mut corners = [0usize; 3];
        for (corner, slot) in corners.iter_mut().enumerate() {
            let offset = record + corner * 12;
            *slot = pool.intern(Vec3::new(
                read_f32(offset),
                read_f32(offset + 4),
                read_f32(offset + 8),
            ));
        }
        faces.push(corners);
    }

    Ok((pool.vertices, faces))
}
