use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolyhedronError;
use crate::geometry::Vec3;
use crate::model::integrity;
use crate::numeric::{GRAVITATIONAL_CONSTANT, GRAVITATIONAL_CONSTANT_KM3};

/// The direction the plane unit normals of the polyhedron point, relative
/// to the body. The line-integral equations require outward normals; with
/// inward normals every result is sign-inverted, which the evaluator
/// compensates through [`NormalOrientation::sign_factor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalOrientation {
    /// Normals point away from the body.
    Outwards,
    /// Normals point into the body.
    Inwards,
}

impl NormalOrientation {
    /// +1.0 for outward normals, -1.0 for inward ones.
    pub fn sign_factor(&self) -> f64 {
        match self {
            NormalOrientation::Outwards => 1.0,
            NormalOrientation::Inwards => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            NormalOrientation::Outwards => NormalOrientation::Inwards,
            NormalOrientation::Inwards => NormalOrientation::Outwards,
        }
    }
}

impl fmt::Display for NormalOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalOrientation::Outwards => write!(f, "OUTWARDS"),
            NormalOrientation::Inwards => write!(f, "INWARDS"),
        }
    }
}

/// Which integrity measures run during polyhedron construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityPolicy {
    /// No checks at all; no runtime overhead.
    Disable,
    /// Degeneracy and orientation checks; a violation fails construction.
    /// Quadratic cost in the face count.
    Verify,
    /// Like Verify, but additionally reminds the caller once that the
    /// check costs quadratic time and should be chosen explicitly.
    Automatic,
    /// Like Verify, but a wrong orientation is repaired instead of
    /// rejected. The mesh input is modified.
    Heal,
}

/// The length unit of the mesh coordinates. It decides which form of the
/// gravitational constant enters the result scaling; a unitless mesh is
/// returned raw (only density-scaled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Meter,
    Kilometer,
    Unitless,
}

impl MetricUnit {
    /// The gravitational-constant factor belonging to this unit.
    pub fn gravitational_factor(&self) -> f64 {
        match self {
            MetricUnit::Meter => GRAVITATIONAL_CONSTANT,
            MetricUnit::Kilometer => GRAVITATIONAL_CONSTANT_KM3,
            MetricUnit::Unitless => 1.0,
        }
    }
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricUnit::Meter => write!(f, "m"),
            MetricUnit::Kilometer => write!(f, "km"),
            MetricUnit::Unitless => write!(f, "unitless"),
        }
    }
}

impl FromStr for MetricUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(MetricUnit::Meter),
            "km" => Ok(MetricUnit::Kilometer),
            "unitless" => Ok(MetricUnit::Unitless),
            other => Err(format!(
                "unsupported mesh unit '{other}': must be 'm', 'km' or 'unitless'"
            )),
        }
    }
}

/// Capability of producing an in-memory mesh: an ordered vertex list and
/// triangular faces referencing it by index. Implemented by the mesh file
/// readers; [`Polyhedron::from_source`] consumes it.
pub trait MeshSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn produce_mesh(&self) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), Self::Error>;
}

/// A solid body of constant density, bounded by triangular faces.
///
/// Vertex indexing starts at zero. Each face is an ordered index triple;
/// the ordering defines the plane normal via (v1 - v0) x (v2 - v1). The
/// coordinates are scaled in [`MetricUnit`] and the density must match
/// (mesh in m requires density in kg/m^3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyhedron {
    vertices: Vec<Vec3>,
    pub(crate) faces: Vec<[usize; 3]>,
    density: f64,
    pub(crate) orientation: NormalOrientation,
    metric_unit: MetricUnit,
}

impl Polyhedron {
    /// Builds a polyhedron from vertices and faces, running the integrity
    /// measures selected by `integrity`.
    ///
    /// Fails when a face references a vertex out of range, when vertex 0 is
    /// never used (a one-based index table slipped through), or when the
    /// integrity measures reject the mesh.
    pub fn new(
        vertices: Vec<Vec3>,
        faces: Vec<[usize; 3]>,
        density: f64,
        orientation: NormalOrientation,
        integrity: IntegrityPolicy,
        metric_unit: MetricUnit,
    ) -> Result<Self, PolyhedronError> {
        for (face_index, face) in faces.iter().enumerate() {
            for &vertex_index in face {
                if vertex_index >= vertices.len() {
                    return Err(PolyhedronError::VertexIndexOutOfRange {
                        face: face_index,
                        index: vertex_index,
                        count: vertices.len(),
                    });
                }
            }
        }
        if !faces.iter().any(|face| face.contains(&0)) {
            return Err(PolyhedronError::UnusedBaseVertex);
        }

        let mut polyhedron = Self {
            vertices,
            faces,
            density,
            orientation,
            metric_unit,
        };
        integrity::run_integrity_measures(&mut polyhedron, integrity)?;
        Ok(polyhedron)
    }

    /// Builds a polyhedron from an external mesh source (e.g. a list of
    /// mesh files), then proceeds as [`Polyhedron::new`].
    pub fn from_source<S: MeshSource>(
        source: &S,
        density: f64,
        orientation: NormalOrientation,
        integrity: IntegrityPolicy,
        metric_unit: MetricUnit,
    ) -> Result<Self, PolyhedronError> {
        let (vertices, faces) = source
            .produce_mesh()
            .map_err(|e| PolyhedronError::Source(Box::new(e)))?;
        Self::new(vertices, faces, density, orientation, integrity, metric_unit)
    }

    pub fn count_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn count_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> &Vec3 {
        &self.vertices[index]
    }

    pub fn face(&self, index: usize) -> [usize; 3] {
        self.faces[index]
    }

    /// The three vertex positions of the face at `index`.
    pub fn resolved_face(&self, index: usize) -> [Vec3; 3] {
        let [i0, i1, i2] = self.faces[index];
        [self.vertices[i0], self.vertices[i1], self.vertices[i2]]
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Replaces the density. Must not race with a running evaluation; the
    /// evaluator borrows the polyhedron immutably for its whole lifetime,
    /// so the borrow checker rules that out within one thread of ownership.
    pub fn set_density(&mut self, density: f64) {
        self.density = density;
    }

    pub fn orientation(&self) -> NormalOrientation {
        self.orientation
    }

    /// +1.0 for outward-, -1.0 for inward-pointing normals.
    pub fn sign_factor(&self) -> f64 {
        self.orientation.sign_factor()
    }

    pub fn metric_unit(&self) -> MetricUnit {
        self.metric_unit
    }

    /// The unit of the mesh coordinates as a display string.
    pub fn mesh_unit(&self) -> String {
        self.metric_unit.to_string()
    }

    /// The unit of the density belonging to the mesh unit.
    pub fn density_unit(&self) -> &'static str {
        match self.metric_unit {
            MetricUnit::Meter => "kg/m^3",
            MetricUnit::Kilometer => "kg/km^3",
            MetricUnit::Unitless => "kg",
        }
    }

    /// The evaluation scale factor: orientation sign times density times
    /// the unit's gravitational-constant factor.
    pub fn scaling(&self) -> f64 {
        self.sign_factor() * self.density * self.metric_unit.gravitational_factor()
    }

    /// Yields every face resolved to vertex positions, with `offset`
    /// subtracted from each vertex. Translating by the field point puts
    /// that point at the origin, the frame the analytic kernel works in.
    pub fn translated_faces(&self, offset: Vec3) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces.iter().map(move |&[i0, i1, i2]| {
            [
                self.vertices[i0] - offset,
                self.vertices[i1] - offset,
                self.vertices[i2] - offset,
            ]
        })
    }

    /// One translated face by index; see [`Polyhedron::translated_faces`].
    pub(crate) fn translated_face(&self, index: usize, offset: Vec3) -> [Vec3; 3] {
        let [i0, i1, i2] = self.faces[index];
        [
            self.vertices[i0] - offset,
            self.vertices[i1] - offset,
            self.vertices[i2] - offset,
        ]
    }

    /// True when every face has strictly positive surface area.
    pub fn check_triangles_not_degenerated(&self) -> bool {
        integrity::triangles_not_degenerated(self)
    }

    /// Determines the majority normal orientation by ray casting and the
    /// set of faces violating it. An empty set means every face agrees
    /// with the returned orientation. Quadratic in the face count.
    pub fn check_plane_unit_normal_orientation(&self) -> (NormalOrientation, BTreeSet<usize>) {
        integrity::plane_unit_normal_orientation(self)
    }
}

impl fmt::Display for Polyhedron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Polyhedron density={} vertices={} faces={} orientation={} unit={}>",
            self.density,
            self.count_vertices(),
            self.count_faces(),
            self.orientation,
            self.metric_unit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::relative_eq;

    fn tetrahedron_vertices() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    fn tetrahedron_faces() -> Vec<[usize; 3]> {
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]
    }

    fn tetrahedron() -> Polyhedron {
        Polyhedron::new(
            tetrahedron_vertices(),
            tetrahedron_faces(),
            1.0,
            NormalOrientation::Outwards,
            IntegrityPolicy::Verify,
            MetricUnit::Meter,
        )
        .unwrap()
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let result = Polyhedron::new(
            tetrahedron_vertices(),
            vec![[0, 1, 7]],
            1.0,
            NormalOrientation::Outwards,
            IntegrityPolicy::Disable,
            MetricUnit::Meter,
        );
        assert!(matches!(
            result,
            Err(PolyhedronError::VertexIndexOutOfRange {
                face: 0,
                index: 7,
                ..
            })
        ));
    }

    #[test]
    fn test_unused_vertex_zero_rejected() {
        // Looks one-based: vertex 0 exists but no face mentions it.
        let result = Polyhedron::new(
            tetrahedron_vertices(),
            vec![[1, 2, 3], [3, 2, 1]],
            1.0,
            NormalOrientation::Outwards,
            IntegrityPolicy::Disable,
            MetricUnit::Meter,
        );
        assert!(matches!(result, Err(PolyhedronError::UnusedBaseVertex)));
    }

    #[test]
    fn test_accessors() {
        let tet = tetrahedron();
        assert_eq!(tet.count_vertices(), 4);
        assert_eq!(tet.count_faces(), 4);
        assert_eq!(tet.face(1), [0, 1, 3]);
        let resolved = tet.resolved_face(1);
        assert_eq!(resolved[2], Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(tet.orientation(), NormalOrientation::Outwards);
        assert_eq!(tet.sign_factor(), 1.0);
    }

    #[test]
    fn test_density_update() {
        let mut tet = tetrahedron();
        tet.set_density(2670.0);
        assert_eq!(tet.density(), 2670.0);
    }

    #[test]
    fn test_translated_faces() {
        let tet = tetrahedron();
        let offset = Vec3::new(1.0, 2.0, 3.0);
        let translated: Vec<_> = tet.translated_faces(offset).collect();
        assert_eq!(translated.len(), 4);
        assert_eq!(translated[0][0], Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(translated[1], tet.translated_face(1, offset));
    }

    #[test]
    fn test_scaling_per_unit() {
        let mut tet = tetrahedron();
        tet.set_density(2.0);
        assert!(relative_eq(tet.scaling(), 2.0 * 6.67430e-11, 1e-12));

        let km = Polyhedron::new(
            tetrahedron_vertices(),
            tetrahedron_faces(),
            2.0,
            NormalOrientation::Inwards,
            IntegrityPolicy::Disable,
            MetricUnit::Kilometer,
        )
        .unwrap();
        assert!(relative_eq(km.scaling(), -2.0 * 6.67430e-20, 1e-12));

        let raw = Polyhedron::new(
            tetrahedron_vertices(),
            tetrahedron_faces(),
            3.0,
            NormalOrientation::Outwards,
            IntegrityPolicy::Disable,
            MetricUnit::Unitless,
        )
        .unwrap();
        assert_eq!(raw.scaling(), 3.0);
    }

    #[test]
    fn test_metric_unit_round_trip() {
        for unit in [MetricUnit::Meter, MetricUnit::Kilometer, MetricUnit::Unitless] {
            assert_eq!(unit.to_string().parse::<MetricUnit>().unwrap(), unit);
        }
        assert!("miles".parse::<MetricUnit>().is_err());
    }

    #[test]
    fn test_display() {
        let tet = tetrahedron();
        let text = tet.to_string();
        assert!(text.contains("vertices=4"));
        assert!(text.contains("faces=4"));
        assert!(text.contains("OUTWARDS"));
    }
}
