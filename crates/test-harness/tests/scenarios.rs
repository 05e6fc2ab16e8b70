//! End-to-end scenarios over the public API: reference cube fields, the
//! worked prism geometry, orientation detection and healing, degenerate
//! meshes, reader dispatch and serial/parallel agreement.

use std::collections::BTreeSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gravity_kernel::eval::FaceGeometry;
use gravity_kernel::geometry::HessianPlane;
use gravity_kernel::numeric::{sgn, ulp_eq, EPSILON_ZERO, MAX_ULP_DISTANCE};
use gravity_kernel::{
    GravityEvaluator, IntegrityPolicy, MeshSource, MetricUnit, NormalOrientation, Polyhedron,
    PolyhedronError, Vec3,
};
use mesh_io::{MeshFiles, MeshReadError};

use test_harness::assertions::{assert_results_eq, assert_scalar_eq};
use test_harness::helpers::{
    cube_faces, cube_vertices, cube_with_flipped_faces, unit_cube, HarnessError,
};

/// One reference line of `analytic_cube_solution.txt`.
struct ReferencePoint {
    point: Vec3,
    potential: f64,
    acceleration: Vec3,
}

fn read_reference_points() -> Vec<ReferencePoint> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/analytic_cube_solution.txt");
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|line| {
            let values: Vec<f64> = line
                .split_whitespace()
                .map(|token| token.parse().expect("reference file holds numbers"))
                .collect();
            assert_eq!(values.len(), 7, "layout is x y z V ax ay az");
            ReferencePoint {
                point: Vec3::new(values[0], values[1], values[2]),
                potential: values[3],
                acceleration: Vec3::new(values[4], values[5], values[6]),
            }
        })
        .collect()
}

// S1: the cube against the closed-form box field, inside and outside.
#[test]
fn scenario_cube_matches_analytic_solution() -> Result<(), HarnessError> {
    let cube = unit_cube(MetricUnit::Unitless)?;
    let evaluator = GravityEvaluator::new(&cube);

    for reference in read_reference_points() {
        let ctx = format!("cube at {:?}", reference.point.to_array());
        let result = evaluator.evaluate(reference.point, false);
        assert_scalar_eq(result.potential, reference.potential, 1e-6, &ctx)?;
        for (axis, (actual, expected)) in ["x", "y", "z"].iter().zip(
            result
                .acceleration
                .to_array()
                .iter()
                .zip(reference.acceleration.to_array().iter()),
        ) {
            if expected.abs() > 0.0 {
                assert_scalar_eq(*actual, *expected, 1e-6, &format!("{ctx}: a{axis}"))?;
            } else if actual.abs() > 1e-10 {
                return Err(HarnessError::AssertionFailed {
                    detail: format!("{ctx}: a{axis} should vanish, got {actual}"),
                });
            }
        }
    }
    Ok(())
}

// S1 continued: at the centre the tensor diagonal is symmetric.
#[test]
fn scenario_cube_centre_tensor_diagonal_symmetric() -> Result<(), HarnessError> {
    let cube = unit_cube(MetricUnit::Unitless)?;
    let result = GravityEvaluator::new(&cube).evaluate(Vec3::ZERO, false);
    let t = result.tensor;
    assert_scalar_eq(t.yy, t.xx, 1e-10, "tensor yy vs xx")?;
    assert_scalar_eq(t.zz, t.xx, 1e-10, "tensor zz vs xx")?;
    Ok(())
}

// S2: the worked prism's per-face plane distances and orientations, to
// ULP accuracy.
#[test]
fn scenario_prism_plane_quantities() -> Result<(), HarnessError> {
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
    let faces: Vec<[usize; 3]> = vec![
        [0, 1, 3],
        [1, 2, 3],
        [0, 4, 5],
        [0, 5, 1],
        [0, 7, 4],
        [0, 3, 7],
        [1, 5, 6],
        [1, 6, 2],
        [3, 6, 7],
        [2, 6, 3],
        [4, 6, 5],
        [4, 7, 6],
    ];
    let prism = Polyhedron::new(
        vertices,
        faces,
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Verify,
        MetricUnit::Meter,
    )?;

    let expected_distances = [
        25.0, 25.0, 0.0, 0.0, 20.0, 20.0, 0.0, 0.0, 10.0, 10.0, 15.0, 15.0,
    ];
    let expected_orientations = [1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, -1.0, -1.0];

    // The field point is the origin, so the resolved faces are already
    // translated.
    for index in 0..prism.count_faces() {
        let face = prism.resolved_face(index);
        let geometry = FaceGeometry::for_face(&face);
        let plane = HessianPlane::from_triangle(&face[0], &face[1], &face[2]);
        let h_p = plane.distance_to_origin();
        if !ulp_eq(h_p, expected_distances[index], MAX_ULP_DISTANCE) {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "face {index}: h_p {} not within 4 ULP of {}",
                    h_p, expected_distances[index]
                ),
            });
        }
        let sigma_p = sgn(geometry.plane_unit_normal.dot(&face[0]), EPSILON_ZERO);
        if sigma_p != expected_orientations[index] {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "face {index}: sigma_p {} instead of {}",
                    sigma_p, expected_orientations[index]
                ),
            });
        }
    }
    Ok(())
}

// S3: a cube with one reversed face is detected and healed.
#[test]
fn scenario_reversed_face_detected_and_healed() -> Result<(), HarnessError> {
    let flipped = cube_with_flipped_faces(&[0])?;
    let (majority, violators) = flipped.check_plane_unit_normal_orientation();
    assert_eq!(majority, NormalOrientation::Outwards);
    assert_eq!(violators, BTreeSet::from([0]));

    let mut faces = cube_faces();
    faces[0].swap(0, 1);
    let healed = Polyhedron::new(
        cube_vertices(),
        faces,
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Heal,
        MetricUnit::Unitless,
    )?;
    assert_eq!(healed.faces(), cube_faces().as_slice());
    assert_eq!(healed.orientation(), NormalOrientation::Outwards);
    Ok(())
}

// S3 variant: two reversed faces yield the violator pair {0, 4}.
#[test]
fn scenario_two_reversed_faces_detected() -> Result<(), HarnessError> {
    let flipped = cube_with_flipped_faces(&[0, 4])?;
    let (majority, violators) = flipped.check_plane_unit_normal_orientation();
    assert_eq!(majority, NormalOrientation::Outwards);
    assert_eq!(violators, BTreeSet::from([0, 4]));
    Ok(())
}

// S4: a degenerate face is fatal in every checking mode, and visible to
// the explicit check when checking was disabled.
#[test]
fn scenario_degenerate_face() -> Result<(), HarnessError> {
    let mut faces = cube_faces();
    faces[4] = [7, 7, 3];

    for policy in [
        IntegrityPolicy::Verify,
        IntegrityPolicy::Automatic,
        IntegrityPolicy::Heal,
    ] {
        let result = Polyhedron::new(
            cube_vertices(),
            faces.clone(),
            1.0,
            NormalOrientation::Outwards,
            policy,
            MetricUnit::Meter,
        );
        assert!(matches!(result, Err(PolyhedronError::DegenerateFace { face: 4 })));
    }

    let unchecked = Polyhedron::new(
        cube_vertices(),
        faces,
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Disable,
        MetricUnit::Meter,
    )?;
    assert!(!unchecked.check_triangles_not_degenerated());
    Ok(())
}

// S5: an unsupported suffix fails before any geometry is constructed.
#[test]
fn scenario_unsupported_suffix() {
    let source = MeshFiles::new(["points.xyz"]);
    assert!(matches!(
        source.produce_mesh(),
        Err(MeshReadError::UnsupportedSuffix { .. })
    ));

    let constructed = Polyhedron::from_source(
        &source,
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Disable,
        MetricUnit::Meter,
    );
    assert!(matches!(constructed, Err(PolyhedronError::Source(_))));
}

// S6: serial and parallel evaluation agree at a thousand random outside
// points, and the potential stays non-negative there.
#[test]
fn scenario_serial_parallel_agreement() -> Result<(), HarnessError> {
    let cube = unit_cube(MetricUnit::Unitless)?;
    let evaluator = GravityEvaluator::new(&cube);

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut points = Vec::with_capacity(1000);
    while points.len() < 1000 {
        let candidate = Vec3::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        );
        let inside_shell = candidate.x.abs() <= 1.5
            && candidate.y.abs() <= 1.5
            && candidate.z.abs() <= 1.5;
        if !inside_shell {
            points.push(candidate);
        }
    }

    let serial = evaluator.evaluate_many(&points, false);
    let parallel = evaluator.evaluate_many(&points, true);
    for (index, ((point, a), b)) in points.iter().zip(serial.iter()).zip(parallel.iter()).enumerate()
    {
        assert_results_eq(a, b, &format!("point {index} {:?}", point.to_array()))?;
        if a.potential < 0.0 {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "potential must be non-negative outside the body, got {} at {:?}",
                    a.potential,
                    point.to_array()
                ),
            });
        }
    }

    // The per-face parallel path must agree as well.
    let spot = points[0];
    assert_results_eq(
        &evaluator.evaluate(spot, true),
        &evaluator.evaluate(spot, false),
        "per-face parallelism",
    )?;
    Ok(())
}

// Invariant 4: flipping every face and the declared orientation leaves
// the results unchanged.
#[test]
fn scenario_orientation_flip_is_neutral() -> Result<(), HarnessError> {
    let outwards = unit_cube(MetricUnit::Unitless)?;
    let inwards_faces: Vec<[usize; 3]> = cube_faces()
        .into_iter()
        .map(|mut face| {
            face.swap(0, 1);
            face
        })
        .collect();
    let inwards = Polyhedron::new(
        cube_vertices(),
        inwards_faces,
        1.0,
        NormalOrientation::Inwards,
        IntegrityPolicy::Verify,
        MetricUnit::Unitless,
    )?;

    let point = Vec3::new(2.25, -1.75, 0.5);
    let a = GravityEvaluator::new(&outwards).evaluate(point, false);
    let b = GravityEvaluator::new(&inwards).evaluate(point, false);
    assert_results_eq(&a, &b, "orientation flip")
}

// Invariant 5: a kilometre mesh with the kilometre constant scales the
// metre result by 1e-9.
#[test]
fn scenario_metric_unit_scaling() -> Result<(), HarnessError> {
    let meter = unit_cube(MetricUnit::Meter)?;
    let kilometer = unit_cube(MetricUnit::Kilometer)?;
    let unitless = unit_cube(MetricUnit::Unitless)?;
    let point = Vec3::new(0.0, 0.0, 2.0);

    let meter_result = GravityEvaluator::new(&meter).evaluate(point, false);
    let kilometer_result = GravityEvaluator::new(&kilometer).evaluate(point, false);
    let unitless_result = GravityEvaluator::new(&unitless).evaluate(point, false);

    assert_scalar_eq(
        kilometer_result.potential * 1e9,
        meter_result.potential,
        1e-12,
        "km vs m potential",
    )?;
    assert_scalar_eq(
        unitless_result.potential * gravity_kernel::numeric::GRAVITATIONAL_CONSTANT,
        meter_result.potential,
        1e-12,
        "unitless times G vs m potential",
    )
}
