//! Analytic gravity of homogeneous polyhedra.
//!
//! Computes the exact gravitational potential, acceleration vector and
//! full gradiometric tensor induced by a constant-density polyhedron at
//! arbitrary field points, using the closed-form line-integral method of
//! Tsoulis over triangular faces. Singular positions (the field point on
//! a face, an edge or a vertex) are handled by dedicated correction
//! terms, so the evaluation is defined everywhere in space.
//!
//! The crate is organised around three pieces:
//!
//! - [`model::Polyhedron`]: the mesh, its density and declared normal
//!   orientation, plus the integrity measures that verify (or heal) the
//!   outward orientation every equation relies on;
//! - [`eval::GravityEvaluator`]: caches the field-point independent face
//!   geometry once and reduces per-face contributions, serially or on
//!   the rayon pool;
//! - [`geometry`] and [`numeric`]: the small fixed-size primitives and
//!   floating-point helpers everything else is built from.

pub mod error;
pub mod eval;
pub mod geometry;
pub mod model;
pub mod numeric;

pub use error::PolyhedronError;
pub use eval::{evaluate, evaluate_many, GravityEvaluator, GravityResult};
pub use geometry::{Tensor6, Vec3};
pub use model::{IntegrityPolicy, MeshSource, MetricUnit, NormalOrientation, Polyhedron};

/// The crate version, exposed for reporting at external surfaces.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
