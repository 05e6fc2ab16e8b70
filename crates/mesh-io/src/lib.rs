//! Mesh file ingestion for the polyhedral gravity model.
//!
//! Translates mesh files into the (vertices, triangular faces) pair the
//! kernel's polyhedron is built from. Supported inputs, recognized by
//! case-insensitive suffix:
//!
//! - a `.node` + `.face` pair (TetGen), nodes first;
//! - a single `.off`, `.ply` (ASCII), `.stl` (ASCII or binary) or
//!   `.mesh` (Medit) file;
//! - a single `.obj` or `.tab` Wavefront-style file.
//!
//! Non-triangular facets are fan-triangulated on the way in. More than
//! two files never form a valid input.

pub mod error;
mod formats;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use gravity_kernel::{MeshSource, Vec3};

pub use error::MeshReadError;

/// The file suffixes accepted by [`read_polyhedral_source`].
pub const SUPPORTED_SUFFIXES: [&str; 8] =
    ["node", "face", "off", "ply", "stl", "mesh", "obj", "tab"];

fn open(path: &Path) -> Result<BufReader<File>, MeshReadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| MeshReadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn suffix_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
}

/// Reads a polyhedral source from an ordered list of mesh file paths.
///
/// One path selects a single-file format by suffix; two paths must be the
/// `.node`/`.face` pair in that order. Anything else is rejected before
/// any file is opened.
pub fn read_polyhedral_source(
    paths: &[PathBuf],
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    match paths {
        [] => Err(MeshReadError::NoFiles),
        [single] => read_single(single),
        [nodes, faces] => read_node_face_pair(nodes, faces),
        _ => Err(MeshReadError::TooManyFiles { count: paths.len() }),
    }
}

fn read_single(path: &PathBuf) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let suffix = suffix_of(path).ok_or_else(|| MeshReadError::UnsupportedSuffix {
        path: path.clone(),
    })?;
    debug!(?path, suffix, "reading mesh file");
    match suffix.as_str() {
        "obj" | "tab" => formats::obj::parse(open(path)?, path),
        "off" => formats::off::parse(open(path)?, path),
        "ply" => formats::ply::parse(open(path)?, path),
        "stl" => formats::stl::parse(open(path)?, path),
        "mesh" => formats::medit::parse(open(path)?, path),
        "node" | "face" => Err(MeshReadError::MissingCompanion { path: path.clone() }),
        _ => Err(MeshReadError::UnsupportedSuffix { path: path.clone() }),
    }
}

fn read_node_face_pair(
    nodes: &PathBuf,
    faces: &PathBuf,
) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), MeshReadError> {
    let node_suffix = suffix_of(nodes);
    let face_suffix = suffix_of(faces);
    if node_suffix.as_deref() != Some("node") || face_suffix.as_deref() != Some("face") {
        return Err(MeshReadError::MismatchedPair {
            first: nodes.clone(),
            second: faces.clone(),
        });
    }
    debug!(?nodes, ?faces, "reading node/face pair");
    let (vertices, base) = formats::node_face::parse_nodes(open(nodes)?, nodes)?;
    let face_list = formats::node_face::parse_faces(open(faces)?, faces, base)?;
    Ok((vertices, face_list))
}

/// An ordered list of mesh files, usable directly as the polyhedron's
/// mesh source:
///
/// ```no_run
/// use gravity_kernel::{IntegrityPolicy, MetricUnit, NormalOrientation, Polyhedron};
/// use mesh_io::MeshFiles;
///
/// let source = MeshFiles::new(["eros.node", "eros.face"]);
/// let polyhedron = Polyhedron::from_source(
///     &source,
///     2670.0,
///     NormalOrientation::Outwards,
///     IntegrityPolicy::Verify,
///     MetricUnit::Meter,
/// )?;
/// # Ok::<(), gravity_kernel::PolyhedronError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MeshFiles {
    paths: Vec<PathBuf>,
}

impl MeshFiles {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl MeshSource for MeshFiles {
    type Error = MeshReadError;

    fn produce_mesh(&self) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), Self::Error> {
        read_polyhedral_source(&self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> PathBuf {
        PathBuf::from(name)
    }

    #[test]
    fn test_no_files_rejected() {
        assert!(matches!(
            read_polyhedral_source(&[]),
            Err(MeshReadError::NoFiles)
        ));
    }

    #[test]
    fn test_too_many_files_rejected_before_io() {
        let result = read_polyhedral_source(&[
            path("a.node"),
            path("a.face"),
            path("a.off"),
        ]);
        assert!(matches!(
            result,
            Err(MeshReadError::TooManyFiles { count: 3 })
        ));
    }

    #[test]
    fn test_unsupported_suffix_rejected_before_io() {
        // The file does not exist; the suffix alone must reject it.
        let result = read_polyhedral_source(&[path("points.xyz")]);
        assert!(matches!(
            result,
            Err(MeshReadError::UnsupportedSuffix { .. })
        ));
    }

    #[test]
    fn test_single_node_file_needs_companion() {
        assert!(matches!(
            read_polyhedral_source(&[path("alone.node")]),
            Err(MeshReadError::MissingCompanion { .. })
        ));
    }

    #[test]
    fn test_pair_must_be_node_then_face() {
        let swapped = read_polyhedral_source(&[path("a.face"), path("a.node")]);
        assert!(matches!(swapped, Err(MeshReadError::MismatchedPair { .. })));
    }

    #[test]
    fn test_suffix_is_case_insensitive() {
        // Dispatch accepts the upper-case suffix and then fails on I/O
        // because the file does not exist.
        let result = read_polyhedral_source(&[path("missing.STL")]);
        assert!(matches!(result, Err(MeshReadError::Io { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_polyhedral_source(&[path("does-not-exist.obj")]);
        assert!(matches!(result, Err(MeshReadError::Io { .. })));
    }
}
