//! Field-point independent per-face geometry, computed once per
//! polyhedron and reused for every evaluation.

use rayon::prelude::*;

use crate::geometry::Vec3;
use crate::model::Polyhedron;

/// Cached geometry of one triangular face.
///
/// Invariants after construction (non-degenerate faces): the plane unit
/// normal and all three segment unit normals have length one, and the
/// segment normals are orthogonal to the plane normal.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGeometry {
    /// Edge vectors G_q = (v1 - v0, v2 - v1, v0 - v2).
    pub segment_vectors: [Vec3; 3],
    /// Unit normal of the face plane, N = normalize(G_0 x G_1). With
    /// outward vertex winding it points away from the body.
    pub plane_unit_normal: Vec3,
    /// In-plane unit normals of the three segments, n_q =
    /// normalize(G_q x N), each pointing away from the triangle interior.
    pub segment_unit_normals: [Vec3; 3],
}

impl FaceGeometry {
    pub fn for_face(face: &[Vec3; 3]) -> Self {
        let segment_vectors = [
            face[1] - face[0],
            face[2] - face[1],
            face[0] - face[2],
        ];
        let plane_unit_normal = segment_vectors[0]
            .cross(&segment_vectors[1])
            .normalize_or_zero();
        let segment_unit_normals = [
            segment_vectors[0].cross(&plane_unit_normal).normalize_or_zero(),
            segment_vectors[1].cross(&plane_unit_normal).normalize_or_zero(),
            segment_vectors[2].cross(&plane_unit_normal).normalize_or_zero(),
        ];
        Self {
            segment_vectors,
            plane_unit_normal,
            segment_unit_normals,
        }
    }
}

/// Builds the cache for every face of the polyhedron.
pub(crate) fn build_cache(polyhedron: &Polyhedron) -> Vec<FaceGeometry> {
    (0..polyhedron.count_faces())
        .into_par_iter()
        .map(|index| FaceGeometry::for_face(&polyhedron.resolved_face(index)))
        .collect()
}
