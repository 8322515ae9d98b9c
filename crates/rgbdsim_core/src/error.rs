//! Scene error types
//!
//! Every failure the composition layer can raise has its own variant so
//! callers can match on the condition they care about.

use std::io;
use thiserror::Error;

/// Error type for scene construction and composition
#[derive(Debug, Error)]
pub enum SceneError {
    /// Invalid construction parameters (both orientations given, bad fovy, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Template source is not well-formed markup
    #[error("Template format error: {0}")]
    Format(#[from] xmltree::ParseError),
    /// Template is well-formed but lacks a required element
    #[error("Structural error: {0}")]
    Structural(String),
    /// IO error (template or output file)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Writing the composed document failed
    #[error("Document serialize error: {0}")]
    Serialize(#[from] xmltree::Error),
    /// Scene description file is not valid RON
    #[error("Scene description parse error: {0}")]
    Description(#[from] ron::error::SpannedError),
    /// Scene description could not be written as RON
    #[error("Scene description serialize error: {0}")]
    DescriptionSerialize(#[from] ron::Error),
}

impl SceneError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SceneError::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = SceneError::config("fovy must be in (0, 180), got 0");
        let msg = format!("{}", err);
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("fovy"));
    }

    #[test]
    fn test_structural_display() {
        let err = SceneError::Structural("anchor element 'worldbody' not found".to_string());
        assert!(err.to_string().contains("worldbody"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "template missing");
        let err: SceneError = io_err.into();
        match err {
            SceneError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert!(SceneError::Io(io_err).source().is_some());
        assert!(SceneError::config("bad").source().is_none());
    }
}
