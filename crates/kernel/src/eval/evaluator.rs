//! The evaluator: owns the face cache, translates the polyhedron to each
//! field point, reduces the per-face contributions and applies the final
//! scale factor.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::eval::cache::{build_cache, FaceGeometry};
use crate::eval::face::face_contribution;
use crate::eval::GravityResult;
use crate::geometry::Vec3;
use crate::model::Polyhedron;

/// Evaluates the gravity model of one polyhedron at arbitrary field
/// points.
///
/// Construction precomputes the field-point independent face geometry
/// once; afterwards the evaluator and the borrowed polyhedron are
/// immutable, so any number of threads may share one instance.
pub struct GravityEvaluator<'a> {
    polyhedron: &'a Polyhedron,
    cache: Vec<FaceGeometry>,
}

impl<'a> GravityEvaluator<'a> {
    /// Builds the evaluator and its face cache for the given polyhedron.
    #[instrument(skip(polyhedron), fields(faces = polyhedron.count_faces()))]
    pub fn new(polyhedron: &'a Polyhedron) -> Self {
        let cache = build_cache(polyhedron);
        Self { polyhedron, cache }
    }

    pub fn polyhedron(&self) -> &Polyhedron {
        self.polyhedron
    }

    /// The cached geometry of one face.
    pub fn face_geometry(&self, index: usize) -> &FaceGeometry {
        &self.cache[index]
    }

    /// Evaluates potential, acceleration and gradiometric tensor at one
    /// field point. With `parallel` the per-face work is spread over the
    /// rayon pool; the reduction order then varies between runs, moving
    /// results by a few ULP.
    pub fn evaluate(&self, point: Vec3, parallel: bool) -> GravityResult {
        debug!(?point, parallel, "evaluating field point");
        let raw = if parallel {
            (0..self.polyhedron.count_faces())
                .into_par_iter()
                .map(|index| self.raw_face_result(index, point))
                .reduce(|| GravityResult::ZERO, |a, b| a + b)
        } else {
            (0..self.polyhedron.count_faces())
                .map(|index| self.raw_face_result(index, point))
                .fold(GravityResult::ZERO, |a, b| a + b)
        };
        raw.scaled(self.polyhedron.scaling())
    }

    /// Evaluates a batch of field points, preserving the input order.
    /// With `parallel` the points are spread over the rayon pool and each
    /// point runs its face loop serially.
    #[instrument(skip(self, points), fields(points = points.len()))]
    pub fn evaluate_many(&self, points: &[Vec3], parallel: bool) -> Vec<GravityResult> {
        if parallel {
            points
                .par_iter()
                .map(|&point| self.evaluate(point, false))
                .collect()
        } else {
            points
                .iter()
                .map(|&point| self.evaluate(point, false))
                .collect()
        }
    }

    fn raw_face_result(&self, index: usize, point: Vec3) -> GravityResult {
        let face = self.polyhedron.translated_face(index, point);
        face_contribution(&face, &self.cache[index])
    }
}
