//! Scene descriptions
//!
//! A [`SceneDescription`] is the serializable form of a scene: an optional
//! template path plus object and camera templates. It is loaded from and
//! saved to RON files and converted into validated [`GeometricObject`] and
//! [`Camera`] values before composition.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use rgbdsim_math::{Quat, Vec3};

use crate::camera::{Camera, CameraBuilder, CameraDefaults};
use crate::error::SceneError;
use crate::geometry::{Color, GeometricObject, Shape};
use crate::pose::Pose;

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn white() -> [f64; 4] {
    Color::WHITE.rgba
}

/// Serializable shape parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeTemplate {
    /// Box given by its half-extents
    Box { half_extents: [f64; 3] },
    /// Cylinder along local Z
    Cylinder { radius: f64, height: f64 },
    /// Mesh asset reference
    Mesh {
        asset: String,
        #[serde(default = "unit_scale")]
        scale: [f64; 3],
        /// Mesh file to declare in the document's asset block
        #[serde(default)]
        file: Option<String>,
    },
}

impl ShapeTemplate {
    pub fn cuboid(half_extents: [f64; 3]) -> Self {
        ShapeTemplate::Box { half_extents }
    }

    pub fn cylinder(radius: f64, height: f64) -> Self {
        ShapeTemplate::Cylinder { radius, height }
    }

    pub fn mesh(asset: impl Into<String>) -> Self {
        ShapeTemplate::Mesh {
            asset: asset.into(),
            scale: unit_scale(),
            file: None,
        }
    }

    /// Create the runtime shape
    pub fn create_shape(&self) -> Shape {
        match self {
            ShapeTemplate::Box { half_extents } => Shape::Box {
                half_extents: Vec3::from(*half_extents),
            },
            ShapeTemplate::Cylinder { radius, height } => Shape::Cylinder {
                radius: *radius,
                height: *height,
            },
            ShapeTemplate::Mesh { asset, scale, file } => Shape::Mesh {
                asset: asset.clone(),
                scale: Vec3::from(*scale),
                file: file.clone(),
            },
        }
    }

    /// Size parameters that must be strictly positive
    pub fn dimensions(&self) -> Vec<f64> {
        match self {
            ShapeTemplate::Box { half_extents } => half_extents.to_vec(),
            ShapeTemplate::Cylinder { radius, height } => vec![*radius, *height],
            ShapeTemplate::Mesh { scale, .. } => scale.to_vec(),
        }
    }
}

/// Serializable geometric object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    pub shape: ShapeTemplate,
    /// Position in meters
    #[serde(default)]
    pub position: [f64; 3],
    /// Euler angles in radians (exclusive with `quat`)
    #[serde(default)]
    pub euler: Option<[f64; 3]>,
    /// Orientation `[w, x, y, z]` (exclusive with `euler`)
    #[serde(default)]
    pub quat: Option<[f64; 4]>,
    /// RGBA, each channel 0.0-1.0
    #[serde(default = "white")]
    pub color: [f64; 4],
}

impl ObjectTemplate {
    pub fn new(name: impl Into<String>, shape: ShapeTemplate) -> Self {
        Self {
            name: name.into(),
            shape,
            position: [0.0; 3],
            euler: None,
            quat: None,
            color: white(),
        }
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_euler(mut self, euler: [f64; 3]) -> Self {
        self.euler = Some(euler);
        self
    }

    pub fn with_quat(mut self, quat: [f64; 4]) -> Self {
        self.quat = Some(quat);
        self
    }

    pub fn with_color(mut self, color: [f64; 4]) -> Self {
        self.color = color;
        self
    }

    /// Convert into a runtime object
    ///
    /// Fails if both `euler` and `quat` are set.
    pub fn to_object(&self) -> Result<GeometricObject, SceneError> {
        let pose = Pose::from_parts(
            Vec3::from(self.position),
            self.euler.map(Vec3::from),
            self.quat.map(Quat::from),
        )
        .map_err(|_| {
            SceneError::config(format!(
                "object '{}': cannot specify both euler and quat",
                self.name
            ))
        })?;

        let [r, g, b, a] = self.color;
        Ok(GeometricObject::new(self.name.clone(), self.shape.create_shape())
            .with_pose(pose)
            .with_color(Color::new(r, g, b, a)))
    }
}

/// Rotation given as axis and angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    pub axis: [f64; 3],
    pub degrees: f64,
}

impl AxisAngle {
    pub fn to_quat(&self) -> Quat {
        Quat::from_axis_angle(Vec3::from(self.axis), self.degrees.to_radians())
    }
}

/// Serializable camera; unset intrinsics fall back to [`CameraDefaults`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraTemplate {
    pub name: String,
    #[serde(default)]
    pub position: [f64; 3],
    /// Optical-frame orientation `[w, x, y, z]` (exclusive with `axis_angle`)
    #[serde(default)]
    pub quat: Option<[f64; 4]>,
    #[serde(default)]
    pub axis_angle: Option<AxisAngle>,
    #[serde(default)]
    pub fovy: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub depth_scale: Option<f64>,
}

impl CameraTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            quat: None,
            axis_angle: None,
            fovy: None,
            width: None,
            height: None,
            depth_scale: None,
        }
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_quat(mut self, quat: [f64; 4]) -> Self {
        self.quat = Some(quat);
        self
    }

    pub fn with_axis_angle(mut self, axis: [f64; 3], degrees: f64) -> Self {
        self.axis_angle = Some(AxisAngle { axis, degrees });
        self
    }

    pub fn with_fovy(mut self, fovy: f64) -> Self {
        self.fovy = Some(fovy);
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Convert into a validated camera
    pub fn to_camera(&self, defaults: &CameraDefaults) -> Result<Camera, SceneError> {
        let quat = match (self.quat, self.axis_angle) {
            (Some(_), Some(_)) => {
                return Err(SceneError::config(format!(
                    "camera '{}': cannot specify both quat and axis_angle",
                    self.name
                )))
            }
            (Some(q), None) => Quat::from(q),
            (None, Some(aa)) => aa.to_quat(),
            (None, None) => Quat::IDENTITY,
        };

        let mut builder = CameraBuilder::with_defaults(self.name.clone(), defaults)
            .position(Vec3::from(self.position))
            .quat(quat);
        if let Some(fovy) = self.fovy {
            builder = builder.fovy(fovy);
        }
        if self.width.is_some() || self.height.is_some() {
            builder = builder.resolution(
                self.width.unwrap_or(defaults.width),
                self.height.unwrap_or(defaults.height),
            );
        }
        if let Some(scale) = self.depth_scale {
            builder = builder.depth_scale(scale);
        }
        builder.build()
    }
}

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Template document path, relative to the description file
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub objects: Vec<ObjectTemplate>,
    #[serde(default)]
    pub cameras: Vec<CameraTemplate>,
}

impl SceneDescription {
    /// Create a new empty description
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: None,
            objects: Vec::new(),
            cameras: Vec::new(),
        }
    }

    /// Load a description from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(source: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(source)?)
    }

    /// Save a description to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn add_object(&mut self, object: ObjectTemplate) {
        self.objects.push(object);
    }

    pub fn add_camera(&mut self, camera: CameraTemplate) {
        self.cameras.push(camera);
    }

    /// Runtime objects in declaration order
    pub fn objects(&self) -> Result<Vec<GeometricObject>, SceneError> {
        self.objects.iter().map(ObjectTemplate::to_object).collect()
    }

    /// Runtime cameras in declaration order
    pub fn cameras(&self, defaults: &CameraDefaults) -> Result<Vec<Camera>, SceneError> {
        self.cameras.iter().map(|c| c.to_camera(defaults)).collect()
    }

    /// Find a camera template by name
    pub fn camera(&self, name: &str) -> Option<&CameraTemplate> {
        self.cameras.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Orientation;

    const SAMPLE: &str = r#"SceneDescription(
        name: "table",
        objects: [
            ObjectTemplate(
                name: "box0",
                shape: ShapeTemplate(type: "Box", half_extents: [0.1, 0.1, 0.1]),
                position: [0.0, 0.0, 0.05],
                color: [0.8, 0.2, 0.2, 1.0],
            ),
            ObjectTemplate(
                name: "can",
                shape: ShapeTemplate(type: "Cylinder", radius: 0.05, height: 0.1),
                euler: Some([0.0, 0.0, 1.57]),
            ),
        ],
        cameras: [
            CameraTemplate(
                name: "c0",
                position: [0.0, 0.0, 1.0],
                axis_angle: Some(AxisAngle(axis: [1.0, 0.0, 0.0], degrees: 180.0)),
                fovy: Some(60.0),
            ),
        ],
    )"#;

    #[test]
    fn test_parse_sample() {
        let desc = SceneDescription::from_ron_str(SAMPLE).unwrap();
        assert_eq!(desc.name, "table");
        assert_eq!(desc.template, None);
        assert_eq!(desc.objects.len(), 2);
        assert_eq!(desc.objects[1].color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(desc.cameras[0].width, None);
    }

    #[test]
    fn test_objects_conversion() {
        let desc = SceneDescription::from_ron_str(SAMPLE).unwrap();
        let objects = desc.objects().unwrap();
        assert_eq!(objects[0].geom_type(), "box");
        assert_eq!(objects[0].size_string(), "0.1 0.1 0.1");
        assert_eq!(objects[0].pose.position, Vec3::new(0.0, 0.0, 0.05));
        assert_eq!(
            objects[1].pose.orientation,
            Orientation::Euler(Vec3::new(0.0, 0.0, 1.57))
        );
    }

    #[test]
    fn test_cameras_use_defaults() {
        let desc = SceneDescription::from_ron_str(SAMPLE).unwrap();
        let defaults = CameraDefaults {
            width: 320,
            height: 240,
            ..CameraDefaults::default()
        };
        let cameras = desc.cameras(&defaults).unwrap();
        assert_eq!(cameras[0].fovy(), 60.0);
        assert_eq!(cameras[0].resolution(), (320, 240));
        assert_eq!(cameras[0].depth_scale(), 1000.0);
        assert!(cameras[0]
            .base_quat()
            .approx_same_rotation(&Quat::IDENTITY, 1e-12));
    }

    #[test]
    fn test_both_orientations_rejected() {
        let object = ObjectTemplate::new("b", ShapeTemplate::cuboid([0.1; 3]))
            .with_euler([0.0; 3])
            .with_quat([1.0, 0.0, 0.0, 0.0]);
        assert!(matches!(object.to_object(), Err(SceneError::Configuration(_))));

        let camera = CameraTemplate::new("c")
            .with_quat([1.0, 0.0, 0.0, 0.0])
            .with_axis_angle([1.0, 0.0, 0.0], 90.0);
        let result = camera.to_camera(&CameraDefaults::default());
        assert!(matches!(result, Err(SceneError::Configuration(_))));
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let camera = CameraTemplate::new("c").with_fovy(0.0);
        assert!(camera.to_camera(&CameraDefaults::default()).is_err());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut desc = SceneDescription::new("round trip").with_template("scene.xml");
        desc.add_object(
            ObjectTemplate::new(
                "mesh0",
                ShapeTemplate::Mesh {
                    asset: "cube".to_string(),
                    scale: [0.1, 0.1, 0.1],
                    file: Some("cube.stl".to_string()),
                },
            )
            .with_quat([1.0, 0.0, 0.0, 0.0]),
        );
        desc.add_camera(CameraTemplate::new("c0").with_resolution(1280, 720));

        let text = desc.to_ron_string().unwrap();
        let parsed = SceneDescription::from_ron_str(&text).unwrap();
        assert_eq!(parsed, desc);
    }

    #[test]
    fn test_mesh_scale_defaults_to_unit() {
        let shape: ShapeTemplate = ron::from_str(r#"(type: "Mesh", asset: "cube")"#).unwrap();
        assert_eq!(shape, ShapeTemplate::mesh("cube"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("rgbdsim_desc_{}.ron", std::process::id()));
        let mut desc = SceneDescription::new("saved");
        desc.add_object(ObjectTemplate::new("b", ShapeTemplate::cylinder(0.05, 0.1)));
        desc.save(&path).unwrap();
        let loaded = SceneDescription::load(&path).unwrap();
        assert_eq!(loaded, desc);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_parse_error() {
        let result = SceneDescription::from_ron_str("SceneDescription(name: ");
        assert!(matches!(result, Err(SceneError::Description(_))));
    }

    #[test]
    fn test_camera_lookup() {
        let desc = SceneDescription::from_ron_str(SAMPLE).unwrap();
        assert!(desc.camera("c0").is_some());
        assert!(desc.camera("nope").is_none());
    }
}
