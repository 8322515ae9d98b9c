//! Pose (position + orientation) of a static body
//!
//! An orientation is either an Euler triple or a quaternion, never both.
//! [`Orientation`] makes the mixed case unrepresentable; [`Pose::from_parts`]
//! is the checked entry point for callers that carry both as optional fields.

use rgbdsim_math::{Quat, Vec3};

use crate::error::SceneError;
use crate::fragment::fmt_nums;

/// Body orientation as written to the scene document
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    /// Euler angles in radians
    Euler(Vec3),
    /// Quaternion `(w, x, y, z)`
    Quat(Quat),
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Euler(Vec3::ZERO)
    }
}

impl Orientation {
    /// Attribute name and value for the body element
    pub fn attribute(&self) -> (&'static str, String) {
        match self {
            Orientation::Euler(e) => ("euler", fmt_nums(&e.to_array())),
            Orientation::Quat(q) => ("quat", fmt_nums(&q.to_array())),
        }
    }
}

/// Position in meters plus orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl Pose {
    /// Build a pose from optional Euler / quaternion parts
    ///
    /// Both given is a configuration error; neither given means zero Euler.
    pub fn from_parts(
        position: Vec3,
        euler: Option<Vec3>,
        quat: Option<Quat>,
    ) -> Result<Self, SceneError> {
        let orientation = match (euler, quat) {
            (Some(_), Some(_)) => {
                return Err(SceneError::config(
                    "cannot specify both euler and quat; choose one",
                ))
            }
            (Some(e), None) => Orientation::Euler(e),
            (None, Some(q)) => Orientation::Quat(q),
            (None, None) => Orientation::default(),
        };
        Ok(Self { position, orientation })
    }

    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.orientation = Orientation::Euler(euler);
        self
    }

    pub fn with_quat(mut self, quat: Quat) -> Self {
        self.orientation = Orientation::Quat(quat);
        self
    }
}
