//! Mesh integrity measures: degeneracy detection, majority-orientation
//! detection by ray casting, and orientation healing.
//!
//! The orientation test casts a ray from each face centroid along the
//! face's current plane normal and counts distinct intersection points
//! with the remaining faces. An odd count means the normal points into
//! the body. Quadratic in the face count, deterministic for a given mesh.

use std::collections::BTreeSet;

use tracing::{instrument, warn};

use crate::error::PolyhedronError;
use crate::geometry::{ray_triangle, triangle_area, triangle_centroid, Ray, Vec3};
use crate::model::{IntegrityPolicy, NormalOrientation, Polyhedron};
use crate::numeric::EPSILON_ZERO;

/// True when every face spans a strictly positive surface area.
pub(crate) fn triangles_not_degenerated(polyhedron: &Polyhedron) -> bool {
    first_degenerate_face(polyhedron).is_none()
}

fn first_degenerate_face(polyhedron: &Polyhedron) -> Option<usize> {
    (0..polyhedron.count_faces()).find(|&index| {
        let [v0, v1, v2] = polyhedron.resolved_face(index);
        triangle_area(&v0, &v1, &v2) <= 0.0
    })
}

/// Counts the distinct points in which a ray cast from the centroid of
/// `face` along its plane normal pierces the polyhedron's faces.
///
/// The ray origin is nudged by epsilon along the normal so the source face
/// itself does not count. Shared edges and vertices are crossed through two
/// adjacent faces at the same geometric point; collecting the points in a
/// set keyed by their exact bit patterns collapses those duplicates.
fn count_ray_intersections(polyhedron: &Polyhedron, face: &[Vec3; 3]) -> usize {
    let centroid = triangle_centroid(face);
    let direction = (face[1] - face[0])
        .cross(&(face[2] - face[1]))
        .normalize_or_zero();
    let ray = Ray::new(centroid + direction * EPSILON_ZERO, direction);

    let mut intersections: BTreeSet<[u64; 3]> = BTreeSet::new();
    for other in polyhedron.translated_faces(Vec3::ZERO) {
        if let Some(point) = ray_triangle(&ray, &other) {
            intersections.insert([point.x.to_bits(), point.y.to_bits(), point.z.to_bits()]);
        }
    }
    intersections.len()
}

/// Determines the majority plane-normal orientation and the indices of the
/// faces violating it.
///
/// A face whose ray pierces the mesh an odd number of times has an inward
/// normal. If more than half of all faces count as inward, the majority is
/// inward and the violator set is complemented accordingly.
#[instrument(skip(polyhedron), fields(faces = polyhedron.count_faces()))]
pub(crate) fn plane_unit_normal_orientation(
    polyhedron: &Polyhedron,
) -> (NormalOrientation, BTreeSet<usize>) {
    let face_count = polyhedron.count_faces();
    let violating_outwards: BTreeSet<usize> = (0..face_count)
        .filter(|&index| {
            let face = polyhedron.resolved_face(index);
            count_ray_intersections(polyhedron, &face) % 2 != 0
        })
        .collect();

    if violating_outwards.len() > face_count / 2 {
        let violating_inwards = (0..face_count)
            .filter(|index| !violating_outwards.contains(index))
            .collect();
        (NormalOrientation::Inwards, violating_inwards)
    } else {
        (NormalOrientation::Outwards, violating_outwards)
    }
}

/// Adopts the majority orientation and flips every violating face by
/// swapping its first two vertex indices.
fn heal_plane_unit_normal_orientation(
    polyhedron: &mut Polyhedron,
    majority: NormalOrientation,
    violators: &BTreeSet<usize>,
) {
    polyhedron.orientation = majority;
    for &index in violators {
        polyhedron.faces[index].swap(0, 1);
    }
}

/// Runs the measures selected by `policy` against a freshly built
/// polyhedron, failing construction or repairing the mesh as configured.
pub(crate) fn run_integrity_measures(
    polyhedron: &mut Polyhedron,
    policy: IntegrityPolicy,
) -> Result<(), PolyhedronError> {
    match policy {
        IntegrityPolicy::Disable => return Ok(()),
        IntegrityPolicy::Automatic => {
            warn!(
                "the mesh integrity check verifies that no face is degenerate and that all \
                 plane unit normals point {}; it costs quadratic time in the face count, so \
                 select Verify, Heal or Disable explicitly",
                polyhedron.orientation
            );
        }
        IntegrityPolicy::Verify | IntegrityPolicy::Heal => {}
    }

    if let Some(face) = first_degenerate_face(polyhedron) {
        return Err(PolyhedronError::DegenerateFace { face });
    }

    let (majority, violators) = plane_unit_normal_orientation(polyhedron);
    if majority != polyhedron.orientation || !violators.is_empty() {
        if policy == IntegrityPolicy::Heal {
            heal_plane_unit_normal_orientation(polyhedron, majority, &violators);
        } else {
            return Err(PolyhedronError::OrientationViolation {
                declared: polyhedron.orientation,
                majority,
                violators: violators.into_iter().collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntegrityPolicy, MetricUnit};

    fn cube_vertices() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ]
    }

    fn cube_faces_outwards() -> Vec<[usize; 3]> {
        vec![
            [1, 3, 2],
            [0, 3, 1],
            [0, 1, 5],
            [0, 5, 4],
            [0, 7, 3],
            [0, 4, 7],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 6],
            [3, 7, 6],
            [4, 5, 6],
            [4, 6, 7],
        ]
    }

    fn cube_faces_inwards() -> Vec<[usize; 3]> {
        cube_faces_outwards()
            .into_iter()
            .map(|mut face| {
                face.swap(0, 1);
                face
            })
            .collect()
    }

    /// Outward cube with faces 0 and 4 flipped inwards.
    fn cube_faces_outwards_majority() -> Vec<[usize; 3]> {
        let mut faces = cube_faces_outwards();
        faces[0].swap(0, 1);
        faces[4].swap(0, 1);
        faces
    }

    /// Inward cube with faces 9, 10 and 11 flipped outwards.
    fn cube_faces_inwards_majority() -> Vec<[usize; 3]> {
        let mut faces = cube_faces_inwards();
        for index in [9, 10, 11] {
            faces[index].swap(0, 1);
        }
        faces
    }

    fn build(
        faces: Vec<[usize; 3]>,
        orientation: NormalOrientation,
        policy: IntegrityPolicy,
    ) -> Result<Polyhedron, PolyhedronError> {
        Polyhedron::new(
            cube_vertices(),
            faces,
            1.0,
            orientation,
            policy,
            MetricUnit::Meter,
        )
    }

    #[test]
    fn test_correct_cube_passes_every_policy() {
        for policy in [
            IntegrityPolicy::Disable,
            IntegrityPolicy::Verify,
            IntegrityPolicy::Automatic,
            IntegrityPolicy::Heal,
        ] {
            assert!(build(cube_faces_outwards(), NormalOrientation::Outwards, policy).is_ok());
            assert!(build(cube_faces_inwards(), NormalOrientation::Inwards, policy).is_ok());
        }
    }

    #[test]
    fn test_wrong_declaration_rejected_unless_healed() {
        for (faces, declared) in [
            (cube_faces_outwards(), NormalOrientation::Inwards),
            (cube_faces_inwards(), NormalOrientation::Outwards),
        ] {
            assert!(build(faces.clone(), declared, IntegrityPolicy::Disable).is_ok());
            assert!(matches!(
                build(faces.clone(), declared, IntegrityPolicy::Verify),
                Err(PolyhedronError::OrientationViolation { .. })
            ));
            assert!(matches!(
                build(faces.clone(), declared, IntegrityPolicy::Automatic),
                Err(PolyhedronError::OrientationViolation { .. })
            ));
            assert!(build(faces, declared, IntegrityPolicy::Heal).is_ok());
        }
    }

    #[test]
    fn test_heal_flips_only_the_declaration_for_consistent_meshes() {
        let healed = build(
            cube_faces_outwards(),
            NormalOrientation::Inwards,
            IntegrityPolicy::Heal,
        )
        .unwrap();
        assert_eq!(healed.orientation(), NormalOrientation::Outwards);
        assert_eq!(healed.faces(), cube_faces_outwards().as_slice());
    }

    #[test]
    fn test_majority_detection_with_two_flipped_faces() {
        let polyhedron = build(
            cube_faces_outwards_majority(),
            NormalOrientation::Outwards,
            IntegrityPolicy::Disable,
        )
        .unwrap();
        let (majority, violators) = polyhedron.check_plane_unit_normal_orientation();
        assert_eq!(majority, NormalOrientation::Outwards);
        assert_eq!(violators, BTreeSet::from([0, 4]));
    }

    #[test]
    fn test_majority_detection_inwards_with_complement() {
        let polyhedron = build(
            cube_faces_inwards_majority(),
            NormalOrientation::Outwards,
            IntegrityPolicy::Disable,
        )
        .unwrap();
        let (majority, violators) = polyhedron.check_plane_unit_normal_orientation();
        assert_eq!(majority, NormalOrientation::Inwards);
        assert_eq!(violators, BTreeSet::from([9, 10, 11]));
    }

    #[test]
    fn test_heal_restores_face_lists() {
        let healed = build(
            cube_faces_outwards_majority(),
            NormalOrientation::Outwards,
            IntegrityPolicy::Heal,
        )
        .unwrap();
        assert_eq!(healed.orientation(), NormalOrientation::Outwards);
        assert_eq!(healed.faces(), cube_faces_outwards().as_slice());

        let healed_inwards = build(
            cube_faces_inwards_majority(),
            NormalOrientation::Inwards,
            IntegrityPolicy::Heal,
        )
        .unwrap();
        assert_eq!(healed_inwards.orientation(), NormalOrientation::Inwards);
        assert_eq!(healed_inwards.faces(), cube_faces_inwards().as_slice());
    }

    #[test]
    fn test_heal_is_idempotent() {
        let healed = build(
            cube_faces_outwards_majority(),
            NormalOrientation::Outwards,
            IntegrityPolicy::Heal,
        )
        .unwrap();
        let (majority, violators) = healed.check_plane_unit_normal_orientation();
        assert_eq!(majority, healed.orientation());
        assert!(violators.is_empty());
    }

    #[test]
    fn test_degenerate_face_always_fatal() {
        let mut faces = cube_faces_outwards();
        faces[4] = [7, 7, 3];
        for policy in [
            IntegrityPolicy::Verify,
            IntegrityPolicy::Automatic,
            IntegrityPolicy::Heal,
        ] {
            assert!(matches!(
                build(faces.clone(), NormalOrientation::Outwards, policy),
                Err(PolyhedronError::DegenerateFace { face: 4 })
            ));
        }
        let unchecked = build(faces, NormalOrientation::Outwards, IntegrityPolicy::Disable)
            .unwrap();
        assert!(!unchecked.check_triangles_not_degenerated());
    }

    #[test]
    fn test_prism_orientation_variants() {
        let vertices = vec![
            Vec3::new(-20.0, 0.0, 25.0),
            Vec3::new(0.0, 0.0, 25.0),
            Vec3::new(0.0, 10.0, 25.0),
            Vec3::new(-20.0, 10.0, 25.0),
            Vec3::new(-20.0, 0.0, 15.0),
            Vec3::new(0.0, 0.0, 15.0),
            Vec3::new(0.0, 10.0, 15.0),
            Vec3::new(-20.0, 10.0, 15.0),
        ];
        let outwards = vec![
            [0, 4, 5],
            [0, 5, 1],
            [0, 1, 3],
            [1, 2, 3],
            [1, 5, 6],
            [1, 6, 2],
            [0, 7, 4],
            [0, 3, 7],
            [4, 7, 5],
            [5, 7, 6],
            [2, 7, 3],
            [2, 6, 7],
        ];

        assert!(Polyhedron::new(
            vertices.clone(),
            outwards.clone(),
            1.0,
            NormalOrientation::Outwards,
            IntegrityPolicy::Verify,
            MetricUnit::Meter,
        )
        .is_ok());

        let healed = Polyhedron::new(
            vertices,
            outwards.clone(),
            1.0,
            NormalOrientation::Inwards,
            IntegrityPolicy::Heal,
            MetricUnit::Meter,
        )
        .unwrap();
        assert_eq!(healed.orientation(), NormalOrientation::Outwards);
        assert_eq!(healed.faces(), outwards.as_slice());
    }
}
