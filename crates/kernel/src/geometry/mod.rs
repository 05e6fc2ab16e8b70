//! Fixed-size geometric primitives: 3-vectors, the six-component symmetric
//! tensor, Hessian plane forms, and ray/triangle intersection.

pub mod intersection;
pub mod plane;
pub mod tensor;
pub mod vector;

pub use intersection::{ray_triangle, Ray};
pub use plane::HessianPlane;
pub use tensor::Tensor6;
pub use vector::{det3, triangle_area, triangle_centroid, Vec3};
