use super::vector::Vec3;

/// A plane in Hessian normal form ax + by + cz + d = 0, where (a, b, c) is
/// an (unnormalized) plane normal and d the scaled signed distance of the
/// plane from the origin along that normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HessianPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl HessianPlane {
    /// The plane spanned by the triangle (v0, v1, v2). The normal direction
    /// is (v1 - v0) x (v2 - v0), so it follows the vertex winding.
    pub fn from_triangle(v0: &Vec3, v1: &Vec3, v2: &Vec3) -> Self {
        let normal = (*v1 - *v0).cross(&(*v2 - *v0));
        let d = -normal.dot(v0);
        Self {
            a: normal.x,
            b: normal.y,
            c: normal.z,
            d,
        }
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// The distance of the origin from the plane, |d| / ||(a, b, c)||.
    /// Zero for a degenerate (zero-normal) plane.
    pub fn distance_to_origin(&self) -> f64 {
        let norm = self.normal().length();
        if norm < 1e-15 {
            return 0.0;
        }
        self.d.abs() / norm
    }
}
