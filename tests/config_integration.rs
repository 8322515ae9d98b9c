//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use rgbdsim::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("RGBD_CAMERA__FOVY", "60.0");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("RGBD_CAMERA__FOVY");
    assert_eq!(config.camera.fovy, 60.0);
}

#[test]
#[serial]
fn test_env_override_nested_string() {
    std::env::set_var("RGBD_OUTPUT__DIRECTORY", "captures");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("RGBD_OUTPUT__DIRECTORY");
    assert_eq!(config.output.directory, "captures");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("RGBD_CAMERA__FOVY");

    let config = AppConfig::load().unwrap();
    assert_eq!(config.scene.anchor, "worldbody");
    assert_eq!(config.camera.depth_scale, 1000.0);
    assert_eq!(config.scene.description, "scenes/two_cameras.ron");
}

#[test]
#[serial]
fn test_invalid_env_value_is_error() {
    std::env::set_var("RGBD_CAMERA__WIDTH", "wide");
    let result = AppConfig::load();
    std::env::remove_var("RGBD_CAMERA__WIDTH");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
#[serial]
fn test_user_config_overrides_default() {
    let dir = std::env::temp_dir().join(format!("rgbdsim_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("default.toml"), "[camera]\nfovy = 45.0\nwidth = 640\nheight = 480\ndepth_scale = 1000.0\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[camera]\nfovy = 80.0\nwidth = 1280\nheight = 720\ndepth_scale = 1000.0\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.camera.fovy, 80.0);
    assert_eq!(config.camera.width, 1280);
    // Sections absent from both files keep their defaults.
    assert_eq!(config.output.scene_file, "scene.xml");

    let _ = std::fs::remove_dir_all(&dir);
}
