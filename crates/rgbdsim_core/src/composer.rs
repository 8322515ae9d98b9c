//! SceneComposer - template-based scene document construction
//!
//! Provides a fluent API that merges geometric objects and cameras into a
//! scene template. Construction requires a parsed template, and [`build`]
//! consumes the composer, so an unloaded or already-built composer cannot be
//! used.
//!
//! [`build`]: SceneComposer::build

use std::fs;
use std::path::Path;

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::camera::Camera;
use crate::error::SceneError;
use crate::fragment::append_child;
use crate::geometry::{GeometricObject, Shape};

/// Default anchor element that receives bodies and cameras
pub const DEFAULT_ANCHOR: &str = "worldbody";

/// Minimal template: empty anchor plus a light
pub const DEFAULT_TEMPLATE: &str = r#"<mujoco model="rgbd_scene">
  <worldbody>
    <light name="top_light" pos="0 0 3" dir="0 0 -1" diffuse="0.8 0.8 0.8"/>
  </worldbody>
</mujoco>"#;

/// Builder for scene documents
///
/// # Example
/// ```ignore
/// let xml = SceneComposer::load_template(DEFAULT_TEMPLATE)?
///     .add_object(GeometricObject::cuboid("box0", Vec3::new(0.1, 0.1, 0.1)))
///     .add_camera(camera)
///     .build()?;
/// ```
pub struct SceneComposer {
    root: Element,
    anchor: String,
    objects: Vec<GeometricObject>,
    cameras: Vec<Camera>,
}

impl SceneComposer {
    /// Parse a template from markup text
    pub fn load_template(source: &str) -> Result<Self, SceneError> {
        let root = Element::parse(source.as_bytes())?;
        Ok(Self::from_root(root))
    }

    /// Read and parse a template file
    ///
    /// The file is closed before this returns.
    pub fn load_template_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        Self::load_template(&contents)
    }

    fn from_root(root: Element) -> Self {
        Self {
            root,
            anchor: DEFAULT_ANCHOR.to_string(),
            objects: Vec::new(),
            cameras: Vec::new(),
        }
    }

    /// Use a different anchor element name
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Queue an object; fragments are appended in insertion order
    pub fn add_object(mut self, object: GeometricObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Queue a camera; cameras follow all objects in the document
    pub fn add_camera(mut self, camera: Camera) -> Self {
        self.cameras.push(camera);
        self
    }

    /// Queue several objects
    pub fn add_objects(mut self, objects: impl IntoIterator<Item = GeometricObject>) -> Self {
        self.objects.extend(objects);
        self
    }

    /// Queue several cameras
    pub fn add_cameras(mut self, cameras: impl IntoIterator<Item = Camera>) -> Self {
        self.cameras.extend(cameras);
        self
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Merge everything into the template and serialize it
    ///
    /// Fails with [`SceneError::Structural`] if the anchor element is missing.
    pub fn build(self) -> Result<String, SceneError> {
        let Self {
            mut root,
            anchor,
            objects,
            cameras,
        } = self;

        if root.get_child(anchor.as_str()).is_none() {
            return Err(SceneError::Structural(format!(
                "anchor element '{}' not found under <{}>",
                anchor, root.name
            )));
        }

        declare_mesh_assets(&mut root, &anchor, &objects);

        let anchor_elem = root
            .get_mut_child(anchor.as_str())
            .ok_or_else(|| SceneError::Structural(format!("anchor element '{}' vanished", anchor)))?;
        for object in &objects {
            append_child(anchor_elem, object.render_fragment());
        }
        for camera in &cameras {
            append_child(anchor_elem, camera.render_fragment());
        }

        log::debug!(
            "Composed scene <{}>: {} objects, {} cameras under <{}>",
            root.name,
            objects.len(),
            cameras.len(),
            anchor
        );

        let config = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("  ")
            .write_document_declaration(false);
        let mut buf = Vec::new();
        root.write_with_config(&mut buf, config)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Declare or rescale the mesh assets referenced by mesh objects
fn declare_mesh_assets(root: &mut Element, anchor: &str, objects: &[GeometricObject]) {
    let meshes: Vec<&GeometricObject> = objects
        .iter()
        .filter(|o| matches!(o.shape, Shape::Mesh { .. }))
        .collect();
    if meshes.is_empty() {
        return;
    }

    let needs_asset_block = meshes.iter().any(|o| o.mesh_asset_fragment().is_some());
    if needs_asset_block && root.get_child("asset").is_none() {
        let index = root
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| e.name == anchor))
            .unwrap_or(root.children.len());
        root.children.insert(index, XMLNode::Element(Element::new("asset")));
    }

    for object in meshes {
        let Shape::Mesh { asset, .. } = &object.shape else {
            continue;
        };
        if let Some(declaration) = object.mesh_asset_fragment() {
            if let Some(asset_block) = root.get_mut_child("asset") {
                append_child(asset_block, declaration);
            }
            continue;
        }

        let existing = root.get_mut_child("asset").and_then(|block| {
            block.children.iter_mut().find_map(|n| match n {
                XMLNode::Element(e)
                    if e.name == "mesh"
                        && e.attributes.get("name").map(String::as_str) == Some(asset.as_str()) =>
                {
                    Some(e)
                }
                _ => None,
            })
        });
        match existing {
            Some(mesh) => {
                mesh.attributes.insert("scale".to_string(), object.size_string());
            }
            None => log::warn!(
                "Mesh object '{}' refers to asset '{}' which the template does not declare",
                object.name,
                asset
            ),
        }
    }
}
