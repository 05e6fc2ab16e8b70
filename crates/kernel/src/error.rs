use crate::model::NormalOrientation;

/// Errors raised while constructing or checking a polyhedron.
#[derive(Debug, thiserror::Error)]
pub enum PolyhedronError {
    #[error("face {face} references vertex {index}, but only {count} vertices exist")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    #[error(
        "vertex 0 is never referenced by any face; this is no valid polyhedron \
         (probable issue: the vertex numbering starts at one)"
    )]
    UnusedBaseVertex,

    #[error("face {face} is degenerate: its surface area is zero")]
    DegenerateFace { face: usize },

    #[error(
        "the plane unit normals do not all point {declared}; the majority orientation \
         is {majority} and faces {violators:?} violate it (fix the vertex ordering of \
         those faces, or reconstruct with the integrity policy set to Heal)"
    )]
    OrientationViolation {
        declared: NormalOrientation,
        majority: NormalOrientation,
        violators: Vec<usize>,
    },

    #[error("mesh source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
