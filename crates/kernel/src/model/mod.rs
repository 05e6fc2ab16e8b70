//! The polyhedron model and its integrity measures.

pub mod integrity;
pub mod polyhedron;

pub use polyhedron::{IntegrityPolicy, MeshSource, MetricUnit, NormalOrientation, Polyhedron};
