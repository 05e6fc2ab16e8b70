use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// The symmetric tensor of second potential derivatives, stored as its six
/// distinct components in the fixed order xx, yy, zz, xy, xz, yz.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tensor6 {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl Tensor6 {
    pub const ZERO: Self = Self {
        xx: 0.0,
        yy: 0.0,
        zz: 0.0,
        xy: 0.0,
        xz: 0.0,
        yz: 0.0,
    };

    pub fn new(xx: f64, yy: f64, zz: f64, xy: f64, xz: f64, yz: f64) -> Self {
        Self {
            xx,
            yy,
            zz,
            xy,
            xz,
            yz,
        }
    }

    /// The trace xx + yy + zz (the Laplacian of the potential).
    pub fn trace(&self) -> f64 {
        self.xx + self.yy + self.zz
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.xx, self.yy, self.zz, self.xy, self.xz, self.yz]
    }

    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            xx: arr[0],
            yy: arr[1],
            zz: arr[2],
            xy: arr[3],
            xz: arr[4],
            yz: arr[5],
        }
    }
}

impl Add for Tensor6 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            xx: self.xx + rhs.xx,
            yy: self.yy + rhs.yy,
            zz: self.zz + rhs.zz,
            xy: self.xy + rhs.xy,
            xz: self.xz + rhs.xz,
            yz: self.yz + rhs.yz,
        }
    }
}

impl Mul<f64> for Tensor6 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            xx: self.xx * rhs,
            yy: self.yy * rhs,
            zz: self.zz * rhs,
            xy: self.xy * rhs,
            xz: self.xz * rhs,
            yz: self.yz * rhs,
        }
    }
}
