//! 3x3 matrix (row-major)
//!
//! Holds the pinhole intrinsic matrix `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.

use serde::{Serialize, Deserialize};
use crate::Vec3;

/// Row-major 3x3 matrix; `rows[r][c]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub rows: [[f64; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Element at row `r`, column `c`
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.rows[r][c]
    }

    /// Matrix-vector product
    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        let m = &self.rows;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// True when every element below the diagonal is exactly zero
    pub fn is_upper_triangular(&self) -> bool {
        self.rows[1][0] == 0.0 && self.rows[2][0] == 0.0 && self.rows[2][1] == 0.0
    }
}
