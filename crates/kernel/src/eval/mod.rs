//! Evaluation of the gravity model: the per-face analytic kernel, the
//! field-point independent face cache, and the evaluator that reduces
//! per-face contributions into full results.

pub mod cache;
pub mod face;
pub mod evaluator;

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::geometry::{Tensor6, Vec3};

pub use cache::FaceGeometry;
pub use evaluator::GravityEvaluator;

/// The gravitational field at one field point: the potential V, the first
/// derivatives (x, y, z), and the six distinct second derivatives
/// (xx, yy, zz, xy, xz, yz).
///
/// With a mesh in meters and density in kg/m^3 the units are m^2/s^2,
/// m/s^2 and 1/s^2 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GravityResult {
    pub potential: f64,
    pub acceleration: Vec3,
    pub tensor: Tensor6,
}

impl GravityResult {
    pub const ZERO: Self = Self {
        potential: 0.0,
        acceleration: Vec3::ZERO,
        tensor: Tensor6::ZERO,
    };

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            // The half stems from the derivation of the potential's line
            // integrals; it applies to V only.
            potential: self.potential * factor / 2.0,
            acceleration: self.acceleration * factor,
            tensor: self.tensor * factor,
        }
    }
}

impl Add for GravityResult {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            potential: self.potential + rhs.potential,
            acceleration: self.acceleration + rhs.acceleration,
            tensor: self.tensor + rhs.tensor,
        }
    }
}

/// One-shot convenience: builds an evaluator, evaluates a single point and
/// drops the cache again. Prefer [`GravityEvaluator`] for repeated points.
pub fn evaluate(
    polyhedron: &crate::model::Polyhedron,
    point: Vec3,
    parallel: bool,
) -> GravityResult {
    GravityEvaluator::new(polyhedron).evaluate(point, parallel)
}

/// One-shot convenience for a batch of points; see [`evaluate`].
pub fn evaluate_many(
    polyhedron: &crate::model::Polyhedron,
    points: &[Vec3],
    parallel: bool,
) -> Vec<GravityResult> {
    GravityEvaluator::new(polyhedron).evaluate_many(points, parallel)
}
