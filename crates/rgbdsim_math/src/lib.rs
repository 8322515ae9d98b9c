//! 3D Mathematics Library
//!
//! Double-precision vector, rotation and matrix types for the rgbdsim
//! workspace. Depth back-projection is compared at 1e-9 relative tolerance,
//! so everything here is `f64`.
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - rotation quaternion, scalar first `(w, x, y, z)`
//! - [`Mat3`] - row-major 3x3 matrix

mod vec3;
mod quat;
pub mod mat3;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat3::Mat3;
