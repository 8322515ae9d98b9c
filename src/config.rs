//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RGBD_SECTION__KEY`)
//!
//! Command-line flags override all of these.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use rgbdsim_core::{CameraDefaults, DEFAULT_ANCHOR};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scene input configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Camera defaults for descriptions that leave fields out
    #[serde(default)]
    pub camera: CameraConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RGBD_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // RGBD_CAMERA__FOVY=60 -> camera.fovy = 60
        figment = figment.merge(Env::prefixed("RGBD_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Scene input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Template document used when a description names none
    pub template: String,
    /// Scene description (RON) to compose
    pub description: String,
    /// Element that receives bodies and cameras
    pub anchor: String,
    /// Run the scene validator and log what it finds
    pub validate: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            template: "assets/empty_scene.xml".to_string(),
            description: "scenes/two_cameras.ron".to_string(),
            anchor: DEFAULT_ANCHOR.to_string(),
            validate: true,
        }
    }
}

/// Camera defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fovy: f64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Metric depth to fixed-point factor
    pub depth_scale: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let defaults = CameraDefaults::default();
        Self {
            fovy: defaults.fovy,
            width: defaults.width,
            height: defaults.height,
            depth_scale: defaults.depth_scale,
        }
    }
}

impl CameraConfig {
    /// Convert to the core camera defaults
    pub fn to_camera_defaults(&self) -> CameraDefaults {
        CameraDefaults {
            fovy: self.fovy,
            width: self.width,
            height: self.height,
            depth_scale: self.depth_scale,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for composed scenes and point clouds
    pub directory: String,
    /// File name of the composed scene document
    pub scene_file: String,
    /// Transform point clouds into world coordinates before writing
    pub world_frame: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            scene_file: "scene.xml".to_string(),
            world_frame: false,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.fovy, 45.0);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.scene.anchor, "worldbody");
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_camera_defaults_conversion() {
        let config = CameraConfig {
            fovy: 80.0,
            width: 1280,
            height: 720,
            depth_scale: 1000.0,
        };
        let defaults = config.to_camera_defaults();
        assert_eq!(defaults.fovy, 80.0);
        assert_eq!((defaults.width, defaults.height), (1280, 720));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("depth_scale"));
        assert!(toml.contains("worldbody"));
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/rgbdsim/config").unwrap();
        assert_eq!(config.output.directory, "output");
    }
}
