//! Core types for rgbdsim
//!
//! This crate provides everything needed to describe an RGB-D scene and to
//! turn captured depth back into geometry:
//!
//! - [`GeometricObject`] - Named static body (box, cylinder or mesh)
//! - [`Pose`] - Position plus exactly one orientation representation
//! - [`Camera`] - RGB-D sensor with intrinsics and optical/base frames
//! - [`SceneComposer`] - Merges objects and cameras into a scene template
//! - [`DepthImage`] / [`PointCloud`] - Fixed-point depth and its back-projection
//! - [`SceneDescription`] - Loadable/saveable scene in RON
//! - [`SceneValidator`] - Opt-in checks over a description

mod error;
pub mod fragment;
mod pose;
mod geometry;
mod camera;
mod depth;
mod point_cloud;
mod composer;
mod description;
mod validator;

pub use error::SceneError;
pub use pose::{Orientation, Pose};
pub use geometry::{Color, GeometricObject, Shape};
pub use camera::{
    optical_flip, Camera, CameraBuilder, CameraDefaults, Intrinsics, DEFAULT_DEPTH_SCALE,
    DEFAULT_FOVY, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use depth::{back_project, quantize_sample, BackProjection, DepthImage};
pub use point_cloud::{write_xyz, PointCloud};
pub use composer::{SceneComposer, DEFAULT_ANCHOR, DEFAULT_TEMPLATE};
pub use description::{AxisAngle, CameraTemplate, ObjectTemplate, SceneDescription, ShapeTemplate};
pub use validator::{SceneValidator, ValidationError};

// Re-export math types for convenience
pub use rgbdsim_math::{Mat3, Quat, Vec3};
