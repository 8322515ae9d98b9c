//! Geometric objects
//!
//! A [`GeometricObject`] is a named static body: a [`Pose`], a [`Color`] and a
//! [`Shape`]. Each object renders to a `<body>` fragment holding one `<geom>`.

use rgbdsim_math::{Quat, Vec3};
use xmltree::Element;

use crate::fragment::{append_child, element, fmt_nums};
use crate::pose::Pose;

/// RGBA color, each channel 0.0-1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub rgba: [f64; 4],
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { rgba: [r, g, b, a] }
    }

    /// Opaque color
    pub const fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);

    /// True when every channel lies in [0, 1]
    pub fn in_range(&self) -> bool {
        self.rgba.iter().all(|c| (0.0..=1.0).contains(c))
    }
}

/// Shape-specific parameters
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by its half-extents
    Box { half_extents: Vec3 },
    /// Cylinder along the local Z axis
    Cylinder { radius: f64, height: f64 },
    /// Reference to a mesh asset
    Mesh {
        /// Asset name the geom refers to
        asset: String,
        /// Non-uniform scale applied on the asset declaration
        scale: Vec3,
        /// Mesh file; when set, the composer declares the asset itself
        file: Option<String>,
    },
}

impl Shape {
    /// Geom `type` attribute
    pub fn geom_type(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Mesh { .. } => "mesh",
        }
    }

    /// Size parameters as written to the document
    ///
    /// Mesh geoms carry no `size`; their string is the scale vector.
    pub fn size_string(&self) -> String {
        match self {
            Shape::Box { half_extents } => fmt_nums(&half_extents.to_array()),
            Shape::Cylinder { radius, height } => fmt_nums(&[*radius, *height]),
            Shape::Mesh { scale, .. } => fmt_nums(&scale.to_array()),
        }
    }
}

/// A named static body in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct GeometricObject {
    /// Element key in the document; uniqueness is up to the caller
    pub name: String,
    pub pose: Pose,
    pub color: Color,
    pub shape: Shape,
}

impl GeometricObject {
    /// Create an object at the origin with identity orientation and white color
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            pose: Pose::default(),
            color: Color::default(),
            shape,
        }
    }

    /// Box with the given half-extents
    pub fn cuboid(name: impl Into<String>, half_extents: Vec3) -> Self {
        Self::new(name, Shape::Box { half_extents })
    }

    /// Cylinder with the given radius and height
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64) -> Self {
        Self::new(name, Shape::Cylinder { radius, height })
    }

    /// Mesh referring to `asset`, unit scale
    pub fn mesh(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self::new(
            name,
            Shape::Mesh {
                asset: asset.into(),
                scale: Vec3::ONE,
                file: None,
            },
        )
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.pose = self.pose.with_euler(euler);
        self
    }

    pub fn with_quat(mut self, quat: Quat) -> Self {
        self.pose = self.pose.with_quat(quat);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the mesh scale (no effect on non-mesh shapes)
    pub fn with_scale(mut self, new_scale: Vec3) -> Self {
        if let Shape::Mesh { scale, .. } = &mut self.shape {
            *scale = new_scale;
        }
        self
    }

    /// Set the mesh file (no effect on non-mesh shapes)
    pub fn with_mesh_file(mut self, path: impl Into<String>) -> Self {
        if let Shape::Mesh { file, .. } = &mut self.shape {
            *file = Some(path.into());
        }
        self
    }

    pub fn geom_type(&self) -> &'static str {
        self.shape.geom_type()
    }

    pub fn size_string(&self) -> String {
        self.shape.size_string()
    }

    /// Render the `<body>` element holding this object's `<geom>`
    pub fn render_fragment(&self) -> Element {
        let (orient_key, orient_value) = self.pose.orientation.attribute();
        let mut body = element(
            "body",
            &[
                ("name", self.name.clone()),
                ("pos", fmt_nums(&self.pose.position.to_array())),
                (orient_key, orient_value),
            ],
        );

        let mut geom_attrs = vec![
            ("name", self.name.clone()),
            ("type", self.geom_type().to_string()),
        ];
        match &self.shape {
            Shape::Mesh { asset, .. } => geom_attrs.push(("mesh", asset.clone())),
            _ => geom_attrs.push(("size", self.size_string())),
        }
        geom_attrs.push(("rgba", fmt_nums(&self.color.rgba)));

        append_child(&mut body, element("geom", &geom_attrs));
        body
    }

    /// `<mesh>` asset declaration for mesh objects that name a file
    pub fn mesh_asset_fragment(&self) -> Option<Element> {
        match &self.shape {
            Shape::Mesh {
                asset,
                file: Some(file),
                ..
            } => Some(element(
                "mesh",
                &[
                    ("name", asset.clone()),
                    ("file", file.clone()),
                    ("scale", self.size_string()),
                ],
            )),
            _ => None,
        }
    }
}
