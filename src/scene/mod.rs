//! Scene assembly
//!
//! Turns a scene description plus a template into a composed document and
//! the cameras that will capture it.

mod scene_assembly;

pub use scene_assembly::{resolve_template_path, AssembledScene, SceneAssembly};
