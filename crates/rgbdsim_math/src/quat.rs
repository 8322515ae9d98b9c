//! Unit quaternion for 3D rotations
//!
//! Components are stored scalar-first, `(w, x, y, z)`, which is the order the
//! scene document format expects for `quat` attributes.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};
use crate::Vec3;

/// Quaternion `w + x*i + y*j + z*k`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    /// Scalar component
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Create a quaternion from raw components (scalar first)
    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Create a rotation of `angle` radians about `axis`
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let axis = axis.normalized();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let s = half.sin();
        Self::new(half.cos(), axis.x * s, axis.y * s, axis.z * s)
    }

    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Normalize to unit length (identity for a zero quaternion)
    pub fn normalize(&self) -> Self {
        let n = self.norm();
        if n > 0.0 {
            let inv = 1.0 / n;
            Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate: negates the vector part
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Multiplicative inverse, `conjugate / |q|^2`
    ///
    /// A zero quaternion has no inverse and maps to the identity.
    pub fn inverse(&self) -> Self {
        let n2 = self.norm_squared();
        if n2 > 0.0 {
            let c = self.conjugate();
            Self::new(c.w / n2, c.x / n2, c.y / n2, c.z / n2)
        } else {
            Self::IDENTITY
        }
    }

    /// Hamilton product: result = self * other
    ///
    /// As a rotation, the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let a = self;
        let b = other;
        Self::new(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
    }

    /// Rotate a vector by this (unit) quaternion: v' = q * v * q^-1
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Components as `[w, x, y, z]`
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Component-wise comparison, treating `q` and `-q` as the same rotation
    pub fn approx_same_rotation(&self, other: &Self, eps: f64) -> bool {
        let close = |a: &Self, b: &Self| {
            (a.w - b.w).abs() < eps
                && (a.x - b.x).abs() < eps
                && (a.y - b.y).abs() < eps
                && (a.z - b.z).abs() < eps
        };
        let neg = Self::new(-other.w, -other.x, -other.y, -other.z);
        close(self, other) || close(self, &neg)
    }
}

impl From<[f64; 4]> for Quat {
    #[inline]
    fn from(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.compose(&other)
    }
}
