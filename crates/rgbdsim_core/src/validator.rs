//! Scene description validation
//!
//! The composer accepts whatever it is given. [`SceneValidator`] is the
//! opt-in pass that flags likely mistakes in a [`SceneDescription`] before
//! composition: empty scenes, duplicate names, degenerate shapes and
//! out-of-range colors.

use std::collections::HashSet;

use crate::description::SceneDescription;
use crate::geometry::Color;

/// Validation error found in a scene description
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Scene has neither objects nor cameras
    EmptyScene,
    /// Two objects share a name
    DuplicateObjectName(String),
    /// Two cameras share a name
    DuplicateCameraName(String),
    /// A size parameter is zero, negative or not finite
    NonPositiveDimension { object: String, value: f64 },
    /// A color channel lies outside [0, 1]
    ColorOutOfRange { object: String, rgba: [f64; 4] },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no objects or cameras"),
            ValidationError::DuplicateObjectName(name) => {
                write!(f, "Duplicate object name: '{}'", name)
            }
            ValidationError::DuplicateCameraName(name) => {
                write!(f, "Duplicate camera name: '{}'", name)
            }
            ValidationError::NonPositiveDimension { object, value } => {
                write!(f, "Object '{}' has non-positive dimension {}", object, value)
            }
            ValidationError::ColorOutOfRange { object, rgba } => write!(
                f,
                "Object '{}' color [{}, {}, {}, {}] outside [0, 1]",
                object, rgba[0], rgba[1], rgba[2], rgba[3]
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Static checks over a [`SceneDescription`]
///
/// # Example
/// ```ignore
/// for error in SceneValidator::validate(&description) {
///     log::warn!("{}", error);
/// }
/// ```
pub struct SceneValidator;

impl SceneValidator {
    /// Validate a description, returning all errors found
    pub fn validate(scene: &SceneDescription) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if scene.objects.is_empty() && scene.cameras.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        let mut seen = HashSet::new();
        for object in &scene.objects {
            if !seen.insert(object.name.as_str()) {
                errors.push(ValidationError::DuplicateObjectName(object.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for camera in &scene.cameras {
            if !seen.insert(camera.name.as_str()) {
                errors.push(ValidationError::DuplicateCameraName(camera.name.clone()));
            }
        }

        for object in &scene.objects {
            if let Some(&value) = object
                .shape
                .dimensions()
                .iter()
                .find(|d| !(d.is_finite() && **d > 0.0))
            {
                errors.push(ValidationError::NonPositiveDimension {
                    object: object.name.clone(),
                    value,
                });
            }
            let [r, g, b, a] = object.color;
            if !Color::new(r, g, b, a).in_range() {
                errors.push(ValidationError::ColorOutOfRange {
                    object: object.name.clone(),
                    rgba: object.color,
                });
            }
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(scene: &SceneDescription) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(scene);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{CameraTemplate, ObjectTemplate, ShapeTemplate};

    fn make_valid_scene() -> SceneDescription {
        let mut scene = SceneDescription::new("valid");
        scene.add_object(ObjectTemplate::new("box0", ShapeTemplate::cuboid([0.1; 3])));
        scene.add_camera(CameraTemplate::new("c0"));
        scene
    }

    #[test]
    fn test_valid_scene_returns_no_errors() {
        let errors = SceneValidator::validate(&make_valid_scene());
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
        assert!(SceneValidator::validate_or_error(&make_valid_scene()).is_ok());
    }

    #[test]
    fn test_empty_scene_error() {
        let errors = SceneValidator::validate(&SceneDescription::new("empty"));
        assert_eq!(errors, vec![ValidationError::EmptyScene]);
    }

    #[test]
    fn test_camera_only_scene_is_not_empty() {
        let mut scene = SceneDescription::new("cams");
        scene.add_camera(CameraTemplate::new("c0"));
        assert!(SceneValidator::validate(&scene).is_empty());
    }

    #[test]
    fn test_duplicate_names_detected() {
        let mut scene = make_valid_scene();
        scene.add_object(ObjectTemplate::new("box0", ShapeTemplate::cylinder(0.05, 0.1)));
        scene.add_camera(CameraTemplate::new("c0"));

        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::DuplicateObjectName("box0".to_string())));
        assert!(errors.contains(&ValidationError::DuplicateCameraName("c0".to_string())));
    }

    #[test]
    fn test_object_and_camera_may_share_a_name() {
        let mut scene = SceneDescription::new("shared");
        scene.add_object(ObjectTemplate::new("x", ShapeTemplate::cuboid([0.1; 3])));
        scene.add_camera(CameraTemplate::new("x"));
        assert!(SceneValidator::validate(&scene).is_empty());
    }

    #[test]
    fn test_non_positive_dimension_detected() {
        let mut scene = SceneDescription::new("flat");
        scene.add_object(ObjectTemplate::new("can", ShapeTemplate::cylinder(0.05, 0.0)));

        let errors = SceneValidator::validate(&scene);
        assert_eq!(
            errors,
            vec![ValidationError::NonPositiveDimension {
                object: "can".to_string(),
                value: 0.0,
            }]
        );
    }

    #[test]
    fn test_color_out_of_range_detected() {
        let mut scene = SceneDescription::new("bright");
        scene.add_object(
            ObjectTemplate::new("b", ShapeTemplate::cuboid([0.1; 3])).with_color([1.5, 0.0, 0.0, 1.0]),
        );
        let errors = SceneValidator::validate(&scene);
        assert!(matches!(errors[0], ValidationError::ColorOutOfRange { .. }));
    }

    #[test]
    fn test_display() {
        let err = ValidationError::DuplicateCameraName("c0".to_string());
        assert_eq!(format!("{}", err), "Duplicate camera name: 'c0'");
    }
}
