//! Capture error types

use std::io;
use thiserror::Error;

use rgbdsim_core::SceneError;

/// Error type for simulation setup, capture and frame persistence
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Capture requested before a scene was loaded
    #[error("Simulation not initialized: call setup() before capturing")]
    NotInitialized,
    /// Camera name does not exist in the loaded scene
    #[error("Camera '{0}' not found in the loaded scene")]
    Lookup(String),
    /// The simulation backend rejected the request
    #[error("Backend error: {0}")]
    Backend(String),
    /// A buffer does not match its declared dimensions or format
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    /// PNG encode/decode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// IO error (output directory, frame files)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl CaptureError {
    /// Wrap any backend failure
    pub fn backend(err: impl std::fmt::Display) -> Self {
        CaptureError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_display() {
        let err = CaptureError::Lookup("hand_camera0".to_string());
        assert_eq!(
            err.to_string(),
            "Camera 'hand_camera0' not found in the loaded scene"
        );
    }

    #[test]
    fn test_scene_error_is_transparent() {
        let err: CaptureError = SceneError::Structural("no worldbody".to_string()).into();
        assert_eq!(err.to_string(), "Structural error: no worldbody");
    }

    #[test]
    fn test_backend_helper() {
        let err = CaptureError::backend("model compile failed");
        assert!(matches!(err, CaptureError::Backend(ref m) if m == "model compile failed"));
    }
}
