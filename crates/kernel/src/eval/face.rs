//! The per-face analytic kernel of the line-integral gravity model.
//!
//! Works on a *translated* face: the field point has been subtracted from
//! every vertex, so the origin stands for the field point throughout. Each
//! step below is a closed-form expression of Tsoulis' derivation; the
//! singularity terms remove the integrable singularities that appear when
//! the field point projects onto the face, one of its segments, or a
//! vertex.

use std::f64::consts::PI;

use tracing::warn;

use crate::eval::cache::FaceGeometry;
use crate::eval::GravityResult;
use crate::geometry::{HessianPlane, Tensor6, Vec3};
use crate::numeric::{is_critical_difference, sgn, EPSILON_ZERO};

/// Distances between the field point / its segment projection P'' and the
/// two endpoints of one segment: `l` in 3-D from the field point, `s` in
/// 1-D along the segment direction (signed).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SegmentDistances {
    pub l1: f64,
    pub l2: f64,
    pub s1: f64,
    pub s2: f64,
}

/// The transcendental pair of one segment: LN from the natural logarithm,
/// AN from the arctangent difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Transcendentals {
    pub ln: f64,
    pub an: f64,
}

/// sigma_p: on which side of the face's plane the field point lies.
/// Zero when the (translated) field point lies in the plane itself.
pub(crate) fn plane_normal_orientation(plane_unit_normal: &Vec3, vertex0: &Vec3) -> f64 {
    sgn(plane_unit_normal.dot(vertex0), EPSILON_ZERO)
}

/// P': the origin (the field point) projected orthogonally onto the plane.
pub(crate) fn project_onto_plane(
    plane_unit_normal: &Vec3,
    plane_distance: f64,
    plane: &HessianPlane,
) -> Vec3 {
    *plane_unit_normal * (-sgn(plane.d, EPSILON_ZERO) * plane_distance)
}

/// sigma_pq: on which side of each segment the projection P' lies. +1 puts
/// P' on the triangle-interior side of segment q, 0 on its carrying line.
pub(crate) fn segment_normal_orientations(
    face: &[Vec3; 3],
    projection: &Vec3,
    segment_unit_normals: &[Vec3; 3],
) -> [f64; 3] {
    std::array::from_fn(|q| {
        sgn(
            (face[q] - *projection).dot(&segment_unit_normals[q]),
            EPSILON_ZERO,
        )
    })
}

/// P'' per segment: P' projected orthogonally onto the segment's carrying
/// line. When sigma_pq is zero, P' already lies on that line.
pub(crate) fn project_onto_segments(
    face: &[Vec3; 3],
    projection: &Vec3,
    orientations: &[f64; 3],
) -> [Vec3; 3] {
    std::array::from_fn(|q| {
        if orientations[q] == 0.0 {
            *projection
        } else {
            let start = face[q];
            let direction = face[(q + 1) % 3] - start;
            start + (*projection - start).project_onto(&direction)
        }
    })
}

/// h_pq: the in-plane distances between P' and each P''.
pub(crate) fn segment_distances(projection: &Vec3, segment_projections: &[Vec3; 3]) -> [f64; 3] {
    std::array::from_fn(|q| projection.distance_to(&segment_projections[q]))
}

/// rho_q: distances between P' and each vertex of the face. Used to detect
/// the on-vertex singular position.
pub(crate) fn projection_vertex_norms(projection: &Vec3, face: &[Vec3; 3]) -> [f64; 3] {
    std::array::from_fn(|q| projection.distance_to(&face[q]))
}

/// The endpoint distances of every segment.
///
/// `s` is the signed coordinate of each endpoint along the segment
/// direction, measured from P''. `l` is the plain Euclidean norm of the
/// endpoint (the field point sits at the origin), except when the field
/// point lies on the segment's carrying line (h_p and h_pq both vanish):
/// there `l` inherits the sign of `s`, which keeps the logarithm finite
/// when the field point sits on the line's extension.
pub(crate) fn distances_to_segment_endpoints(
    face: &[Vec3; 3],
    segment_vectors: &[Vec3; 3],
    segment_projections: &[Vec3; 3],
    plane_distance: f64,
    segment_distances: &[f64; 3],
) -> [SegmentDistances; 3] {
    std::array::from_fn(|q| {
        let v1 = face[q];
        let v2 = face[(q + 1) % 3];
        let direction = segment_vectors[q].normalize_or_zero();
        let s1 = (v1 - segment_projections[q]).dot(&direction);
        let s2 = (v2 - segment_projections[q]).dot(&direction);
        let mut l1 = v1.length();
        let mut l2 = v2.length();
        if plane_distance <= EPSILON_ZERO && segment_distances[q] <= EPSILON_ZERO {
            l1 = l1.copysign(s1);
            l2 = l2.copysign(s2);
        }
        SegmentDistances { l1, l2, s1, s2 }
    })
}

/// LN and AN for every segment, with the degenerate positions forced to
/// zero: LN when P' coincides with a segment endpoint on the carrying line
/// (or both endpoint sums vanish), AN when the field point lies in the
/// plane or on the carrying line.
pub(crate) fn transcendentals(
    distances: &[SegmentDistances; 3],
    plane_distance: f64,
    segment_distances: &[f64; 3],
    orientations: &[f64; 3],
    vertex_norms: &[f64; 3],
) -> [Transcendentals; 3] {
    std::array::from_fn(|q| {
        let d = &distances[q];
        let rho1 = vertex_norms[q];
        let rho2 = vertex_norms[(q + 1) % 3];

        let ln = if orientations[q] == 0.0 && (rho1 <= EPSILON_ZERO || rho2 <= EPSILON_ZERO) {
            0.0
        } else if (d.s1 + d.l1).abs() <= EPSILON_ZERO && (d.s2 + d.l2).abs() <= EPSILON_ZERO {
            0.0
        } else {
            ((d.s2 + d.l2) / (d.s1 + d.l1)).ln()
        };

        let an = if plane_distance <= EPSILON_ZERO || segment_distances[q] <= EPSILON_ZERO {
            0.0
        } else {
            let upper = (plane_distance * d.s2) / (segment_distances[q] * d.l2);
            let lower = (plane_distance * d.s1) / (segment_distances[q] * d.l1);
            upper.atan() - lower.atan()
        };

        Transcendentals { ln, an }
    })
}

/// The singularity corrections (alpha, beta) for one face.
///
/// Classifies P' against the face: strictly interior (all sigma_pq = +1,
/// any plane distance), strictly between the endpoints of one segment, at
/// a vertex, or none of those. The correction removes the solid angle the
/// arctangent sum cannot see: 2*pi, pi, or the interior vertex angle.
pub(crate) fn singularity_terms(
    segment_vectors: &[Vec3; 3],
    orientations: &[f64; 3],
    vertex_norms: &[f64; 3],
    plane_unit_normal: &Vec3,
    plane_distance: f64,
    plane_orientation: f64,
) -> (f64, Vec3) {
    if orientations.iter().all(|&sigma| sigma == 1.0) {
        return (
            -2.0 * PI * plane_distance,
            *plane_unit_normal * (-2.0 * PI * plane_orientation),
        );
    }

    for q in 0..3 {
        if orientations[q] == 0.0 {
            let length = segment_vectors[q].length();
            if vertex_norms[q] < length && vertex_norms[(q + 1) % 3] < length {
                return (
                    -PI * plane_distance,
                    *plane_unit_normal * (-PI * plane_orientation),
                );
            }
        }
    }

    for q in 0..3 {
        if vertex_norms[q] <= EPSILON_ZERO {
            let incoming = -segment_vectors[(q + 2) % 3];
            let outgoing = segment_vectors[q];
            let angle = incoming.angle_to(&outgoing);
            return (
                -angle * plane_distance,
                *plane_unit_normal * (-angle * plane_orientation),
            );
        }
    }

    (0.0, Vec3::ZERO)
}

/// The contribution of one translated face to (V, grad V, grad grad V),
/// unscaled; the evaluator applies the common G-density prefix.
pub fn face_contribution(face: &[Vec3; 3], geometry: &FaceGeometry) -> GravityResult {
    let normal = &geometry.plane_unit_normal;

    let sigma_p = plane_normal_orientation(normal, &face[0]);
    let plane = HessianPlane::from_triangle(&face[0], &face[1], &face[2]);
    let h_p = plane.distance_to_origin();
    let p_prime = project_onto_plane(normal, h_p, &plane);
    let sigma_pq = segment_normal_orientations(face, &p_prime, &geometry.segment_unit_normals);
    let segment_projections = project_onto_segments(face, &p_prime, &sigma_pq);
    let h_pq = segment_distances(&p_prime, &segment_projections);
    let endpoint_distances = distances_to_segment_endpoints(
        face,
        &geometry.segment_vectors,
        &segment_projections,
        h_p,
        &h_pq,
    );
    let rho = projection_vertex_norms(&p_prime, face);
    let expressions = transcendentals(&endpoint_distances, h_p, &h_pq, &sigma_pq, &rho);
    let (alpha, beta) = singularity_terms(
        &geometry.segment_vectors,
        &sigma_pq,
        &rho,
        normal,
        h_p,
        sigma_p,
    );

    let mut sum_1 = 0.0;
    let mut sum_2 = 0.0;
    let mut sum_1_tensor = Vec3::ZERO;
    for q in 0..3 {
        sum_1 += sigma_pq[q] * h_pq[q] * expressions[q].ln;
        sum_2 += sigma_pq[q] * expressions[q].an;
        sum_1_tensor = sum_1_tensor + geometry.segment_unit_normals[q] * expressions[q].ln;
    }

    let bracket = sum_1 + h_p * sum_2 + alpha;
    if is_critical_difference(h_p, sum_2) {
        // h_p grows with the distance to the face while the arctangent sum
        // shrinks; once their magnitudes are 50 binary orders apart the
        // product h_p * sum_2 carries almost no significant bits.
        warn!(
            h_p,
            sum_2, "face evaluation may lose all precision for this field point"
        );
    }

    let sub_sum = sum_1_tensor + *normal * (sigma_p * sum_2) + beta;

    GravityResult {
        potential: sigma_p * h_p * bracket,
        acceleration: *normal * bracket,
        tensor: Tensor6::new(
            normal.x * sub_sum.x,
            normal.y * sub_sum.y,
            normal.z * sub_sum.z,
            normal.x * sub_sum.y,
            normal.x * sub_sum.z,
            normal.y * sub_sum.z,
        ),
    }
}
