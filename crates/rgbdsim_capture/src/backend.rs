//! Simulation backend boundary
//!
//! The physics/rendering engine stays outside this workspace. A backend
//! compiles a composed scene document and renders color and metric depth
//! through per-camera renderers that [`Simulation`](crate::Simulation)
//! creates once and reuses.

use crate::error::CaptureError;
use crate::frame::ColorImage;

/// Engine adapter used by [`Simulation`](crate::Simulation)
pub trait SimulationBackend {
    /// Offscreen renderer handle, one per camera
    type Renderer;

    /// Compile `document`, replacing any previously loaded model
    ///
    /// On success the backend holds a model state advanced by one step, ready
    /// to render.
    fn load_scene(&mut self, document: &str) -> Result<(), CaptureError>;

    /// Engine index of the named camera, if the loaded model has one
    fn camera_id(&self, name: &str) -> Option<usize>;

    /// Create an offscreen renderer of the given size
    fn create_renderer(&mut self, width: u32, height: u32)
        -> Result<Self::Renderer, CaptureError>;

    /// Render an RGB8 image from `camera_id`
    fn render_color(
        &mut self,
        renderer: &mut Self::Renderer,
        camera_id: usize,
    ) -> Result<ColorImage, CaptureError>;

    /// Render metric depth (meters, row-major) from `camera_id`
    fn render_depth(
        &mut self,
        renderer: &mut Self::Renderer,
        camera_id: usize,
    ) -> Result<Vec<f32>, CaptureError>;
}
