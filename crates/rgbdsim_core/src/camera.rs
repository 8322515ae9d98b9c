//! RGB-D camera model
//!
//! A [`Camera`] is a pure value: pose, vertical field of view, resolution and
//! depth scale. Its orientation is given for the *optical* frame (+Z into the
//! scene). The engine's own camera frame looks down -Z, so the document
//! carries a *base* orientation instead:
//!
//! ```text
//! base_quat = quat * inverse(flip),  flip = 180 degrees about local X
//! ```
//!
//! Intrinsics follow the pinhole model with vertical FOV as the primary
//! parameter and the horizontal FOV derived from the aspect ratio.

use rgbdsim_math::{Mat3, Quat, Vec3};
use xmltree::Element;

use crate::depth::{BackProjection, DepthImage};
use crate::error::SceneError;
use crate::fragment::{element, fmt_num, fmt_nums};
use crate::point_cloud::PointCloud;

/// Default vertical field of view in degrees
pub const DEFAULT_FOVY: f64 = 45.0;
/// Default image width in pixels
pub const DEFAULT_WIDTH: u32 = 640;
/// Default image height in pixels
pub const DEFAULT_HEIGHT: u32 = 480;
/// Default depth scale: meters to millimeters
pub const DEFAULT_DEPTH_SCALE: f64 = 1000.0;

/// Rotation between the optical and base camera frames (180 degrees about X)
pub fn optical_flip() -> Quat {
    Quat::from_axis_angle(Vec3::X, std::f64::consts::PI)
}

/// Pinhole intrinsic parameters in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Intrinsics {
    /// Derive intrinsics from a vertical FOV (degrees) and image size
    pub fn from_fovy(fovy_deg: f64, width: u32, height: u32) -> Self {
        let width = width as f64;
        let height = height as f64;

        let cx = width / 2.0;
        let cy = height / 2.0;

        let half_fovy = fovy_deg.to_radians() / 2.0;
        let fy = height / (2.0 * half_fovy.tan());

        let aspect_ratio = width / height;
        let fovx = 2.0 * (aspect_ratio * half_fovy.tan()).atan();
        let fx = width / (2.0 * (fovx / 2.0).tan());

        Self { fx, fy, cx, cy }
    }

    /// `(fx, fy, cx, cy)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.fx, self.fy, self.cx, self.cy)
    }

    /// `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_rows([
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Project an optical-frame point to pixel coordinates
    ///
    /// Returns `None` for points at or behind the image plane.
    pub fn project(&self, p: Vec3) -> Option<(f64, f64)> {
        if p.z <= 0.0 {
            return None;
        }
        Some((self.fx * p.x / p.z + self.cx, self.fy * p.y / p.z + self.cy))
    }
}

/// Per-camera defaults applied when a description leaves a field out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDefaults {
    pub fovy: f64,
    pub width: u32,
    pub height: u32,
    pub depth_scale: f64,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            fovy: DEFAULT_FOVY,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            depth_scale: DEFAULT_DEPTH_SCALE,
        }
    }
}

/// A named RGB-D sensor
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    name: String,
    position: Vec3,
    quat: Quat,
    fovy: f64,
    width: u32,
    height: u32,
    depth_scale: f64,
    base_quat: Quat,
}

impl Camera {
    /// Create a camera, validating fovy and resolution
    pub fn new(
        name: impl Into<String>,
        position: Vec3,
        quat: Quat,
        fovy: f64,
        width: u32,
        height: u32,
    ) -> Result<Self, SceneError> {
        Self::builder(name)
            .position(position)
            .quat(quat)
            .fovy(fovy)
            .resolution(width, height)
            .build()
    }

    /// Start building a camera with default parameters
    pub fn builder(name: impl Into<String>) -> CameraBuilder {
        CameraBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Optical-frame orientation as given at construction
    pub fn quat(&self) -> Quat {
        self.quat
    }

    /// Engine-frame orientation written to the document
    pub fn base_quat(&self) -> Quat {
        self.base_quat
    }

    /// Vertical field of view in degrees
    pub fn fovy(&self) -> f64 {
        self.fovy
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Factor from metric depth to fixed-point depth units
    pub fn depth_scale(&self) -> f64 {
        self.depth_scale
    }

    /// Intrinsics, recomputed from fovy and resolution on each call
    pub fn compute_intrinsics(&self) -> Intrinsics {
        Intrinsics::from_fovy(self.fovy, self.width, self.height)
    }

    /// 3x3 intrinsic matrix
    pub fn camera_matrix(&self) -> Mat3 {
        self.compute_intrinsics().matrix()
    }

    /// Render the `<camera>` element (base-frame orientation)
    pub fn render_fragment(&self) -> Element {
        element(
            "camera",
            &[
                ("name", self.name.clone()),
                ("pos", fmt_nums(&self.position.to_array())),
                ("fovy", fmt_num(self.fovy)),
                ("quat", fmt_nums(&self.base_quat.to_array())),
            ],
        )
    }

    /// Lazily back-project a depth image into optical-frame points
    pub fn back_project<'a, T>(&self, depth: &'a DepthImage<T>) -> BackProjection<'a, T>
    where
        T: Copy + Into<f64>,
    {
        BackProjection::new(depth, self.compute_intrinsics(), self.depth_scale)
    }

    /// Back-project and collect into a point cloud
    pub fn point_cloud<T>(&self, depth: &DepthImage<T>) -> PointCloud
    where
        T: Copy + Into<f64>,
    {
        self.back_project(depth).collect()
    }

    /// Lift an optical-frame point into world coordinates
    pub fn optical_to_world(&self, p: Vec3) -> Vec3 {
        self.position + self.quat.normalize().rotate(p)
    }
}

/// Builder for [`Camera`]
///
/// # Example
/// ```ignore
/// let camera = Camera::builder("ceil_camera0")
///     .position(Vec3::new(0.0, 0.0, 1.5))
///     .quat(Quat::from_axis_angle(Vec3::X, PI))
///     .fovy(80.0)
///     .resolution(1280, 720)
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct CameraBuilder {
    name: String,
    position: Vec3,
    quat: Quat,
    fovy: f64,
    width: u32,
    height: u32,
    depth_scale: f64,
}

impl CameraBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_defaults(name, &CameraDefaults::default())
    }

    /// Start from the given defaults instead of the built-in ones
    pub fn with_defaults(name: impl Into<String>, defaults: &CameraDefaults) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            quat: Quat::IDENTITY,
            fovy: defaults.fovy,
            width: defaults.width,
            height: defaults.height,
            depth_scale: defaults.depth_scale,
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Optical-frame orientation `(w, x, y, z)`
    pub fn quat(mut self, quat: Quat) -> Self {
        self.quat = quat;
        self
    }

    /// Vertical field of view in degrees
    pub fn fovy(mut self, fovy: f64) -> Self {
        self.fovy = fovy;
        self
    }

    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn depth_scale(mut self, depth_scale: f64) -> Self {
        self.depth_scale = depth_scale;
        self
    }

    /// Validate parameters and derive the base orientation
    pub fn build(self) -> Result<Camera, SceneError> {
        if !(self.fovy.is_finite() && self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(SceneError::config(format!(
                "camera '{}': fovy must be in (0, 180) degrees, got {}",
                self.name, self.fovy
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::config(format!(
                "camera '{}': resolution must be positive, got {}x{}",
                self.name, self.width, self.height
            )));
        }
        if !(self.depth_scale.is_finite() && self.depth_scale > 0.0) {
            return Err(SceneError::config(format!(
                "camera '{}': depth scale must be positive, got {}",
                self.name, self.depth_scale
            )));
        }

        let base_quat = self.quat * optical_flip().inverse();

        Ok(Camera {
            name: self.name,
            position: self.position,
            quat: self.quat,
            fovy: self.fovy,
            width: self.width,
            height: self.height,
            depth_scale: self.depth_scale,
            base_quat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn camera(fovy: f64, width: u32, height: u32) -> Camera {
        Camera::builder("cam")
            .fovy(fovy)
            .resolution(width, height)
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cam = Camera::builder("cam").build().unwrap();
        assert_eq!(cam.fovy(), 45.0);
        assert_eq!(cam.resolution(), (640, 480));
        assert_eq!(cam.depth_scale(), 1000.0);
        assert_eq!(cam.quat(), Quat::IDENTITY);
    }

    #[test]
    fn test_intrinsics_fovy_60() {
        let (fx, fy, cx, cy) = camera(60.0, 640, 480).compute_intrinsics().as_tuple();
        assert_eq!(cx, 320.0);
        assert_eq!(cy, 240.0);
        assert!((fy - 415.692).abs() < 1e-3, "fy = {}", fy);
        assert!((fx - 415.692).abs() < 1e-3, "fx = {}", fx);
        assert!(approx_eq(fx, fy));
    }

    #[test]
    fn test_camera_matrix_shape() {
        let k = camera(80.0, 1280, 720).camera_matrix();
        assert!(k.is_upper_triangular());
        assert_eq!(k.get(0, 2), 640.0);
        assert_eq!(k.get(1, 2), 360.0);
        assert_eq!(k.get(0, 1), 0.0);
        assert_eq!(k.get(2, 2), 1.0);
    }

    #[test]
    fn test_narrower_fov_longer_focal_length() {
        let mut last = 0.0;
        for fovy in [170.0, 120.0, 90.0, 60.0, 30.0, 10.0, 1.0] {
            let fy = camera(fovy, 640, 480).compute_intrinsics().fy;
            assert!(fy > last, "fy must grow as fovy shrinks");
            last = fy;
        }
    }

    #[test]
    fn test_invalid_fovy_rejected() {
        for fovy in [0.0, -10.0, 180.0, 200.0, f64::NAN] {
            let result = Camera::builder("cam").fovy(fovy).build();
            assert!(matches!(result, Err(SceneError::Configuration(_))), "fovy {}", fovy);
        }
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(Camera::builder("cam").resolution(0, 480).build().is_err());
        assert!(Camera::builder("cam").resolution(640, 0).build().is_err());
    }

    #[test]
    fn test_invalid_depth_scale_rejected() {
        assert!(Camera::builder("cam").depth_scale(0.0).build().is_err());
        assert!(Camera::builder("cam").depth_scale(-1.0).build().is_err());
    }

    #[test]
    fn test_base_quat_of_downward_optical_frame_is_identity() {
        let cam = Camera::builder("ceil")
            .quat(Quat::from_axis_angle(Vec3::X, PI))
            .build()
            .unwrap();
        assert!(cam.base_quat().approx_same_rotation(&Quat::IDENTITY, 1e-12));
    }

    #[test]
    fn test_base_quat_of_identity_is_flip_inverse() {
        let cam = Camera::builder("cam").build().unwrap();
        let expected = optical_flip().inverse();
        assert!(cam.base_quat().approx_same_rotation(&expected, 1e-12));
        // Engine forward (-Z of base) must match optical forward (+Z).
        let optical_forward = cam.quat().rotate(Vec3::Z);
        let base_forward = cam.base_quat().rotate(-Vec3::Z);
        assert!((optical_forward - base_forward).length() < 1e-12);
    }

    #[test]
    fn test_fragment_uses_base_quat() {
        let cam = Camera::builder("c0")
            .position(Vec3::new(0.0, 0.0, 1.0))
            .fovy(60.0)
            .build()
            .unwrap();
        let elem = cam.render_fragment();
        assert_eq!(elem.name, "camera");
        assert_eq!(elem.attributes.get("name").map(String::as_str), Some("c0"));
        assert_eq!(elem.attributes.get("pos").map(String::as_str), Some("0.0 0.0 1.0"));
        assert_eq!(elem.attributes.get("fovy").map(String::as_str), Some("60.0"));
        let quat = elem.attributes.get("quat").unwrap();
        assert_eq!(quat, &fmt_nums(&cam.base_quat().to_array()));
        assert_ne!(quat, "1.0 0.0 0.0 0.0");
    }

    #[test]
    fn test_project_inverts_back_projection_formula() {
        let k = Intrinsics::from_fovy(60.0, 640, 480);
        let (u, v) = k.project(Vec3::new(0.1, -0.2, 2.0)).unwrap();
        let x = (u - k.cx) * 2.0 / k.fx;
        let y = (v - k.cy) * 2.0 / k.fy;
        assert!(approx_eq(x, 0.1));
        assert!(approx_eq(y, -0.2));
        assert!(k.project(Vec3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_optical_to_world() {
        // Looking straight down from 1.5 m: optical +Z maps to world -Z.
        let cam = Camera::builder("ceil")
            .position(Vec3::new(0.0, 0.0, 1.5))
            .quat(Quat::from_axis_angle(Vec3::X, PI))
            .build()
            .unwrap();
        let world = cam.optical_to_world(Vec3::new(0.0, 0.0, 1.5));
        assert!(world.length() < 1e-12);
    }
}
