//! rgbdsim - RGB-D scene composition and depth back-projection
//!
//! The library half of the `rgbdsim` package: layered configuration and
//! assembly of scene descriptions into composed documents. Geometry, cameras
//! and capture live in the workspace crates.

pub mod config;
pub mod scene;
