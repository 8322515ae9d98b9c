//! RGB-D capture for rgbdsim
//!
//! The rendering engine is an external collaborator reached through
//! [`SimulationBackend`]. This crate provides:
//!
//! - [`Simulation`] - Setup/capture state machine over a backend
//! - [`RendererPool`] - At most one renderer per camera, reused across captures
//! - [`CaptureFrame`] - Color plus fixed-point depth, saved as PNG
//! - [`CaptureError`] - Error type for setup, capture and persistence

mod error;
mod backend;
mod renderer_pool;
mod simulation;
mod frame;

pub use error::CaptureError;
pub use backend::SimulationBackend;
pub use renderer_pool::RendererPool;
pub use simulation::Simulation;
pub use frame::{load_depth_png, save_depth_png, CaptureFrame, ColorImage, FramePaths};
