//! Simulation state machine
//!
//! `Simulation` starts uninitialized. [`Simulation::setup`] hands a composed
//! scene document to the backend; only then can cameras be captured. Each
//! capture renders color and metric depth, then converts depth to the
//! camera's fixed-point representation.

use rgbdsim_core::{Camera, DepthImage};

use crate::backend::SimulationBackend;
use crate::error::CaptureError;
use crate::frame::CaptureFrame;
use crate::renderer_pool::RendererPool;

/// Owns a backend and the per-camera renderers created through it
pub struct Simulation<B: SimulationBackend> {
    backend: B,
    renderers: RendererPool<B::Renderer>,
    initialized: bool,
}

impl<B: SimulationBackend> Simulation<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            renderers: RendererPool::new(),
            initialized: false,
        }
    }

    /// Load a composed scene document
    ///
    /// Renderers from a previous scene are dropped. If loading fails the
    /// simulation is left uninitialized.
    pub fn setup(&mut self, document: &str) -> Result<(), CaptureError> {
        self.initialized = false;
        self.renderers.clear();
        self.backend.load_scene(document)?;
        self.initialized = true;
        log::info!("Simulation scene loaded ({} bytes)", document.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of renderers created so far for the current scene
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Render one RGB-D frame from `camera`
    ///
    /// The renderer for `camera` is created on first use and reused after.
    pub fn capture(&mut self, camera: &Camera) -> Result<CaptureFrame, CaptureError> {
        if !self.initialized {
            return Err(CaptureError::NotInitialized);
        }
        let camera_id = self
            .backend
            .camera_id(camera.name())
            .ok_or_else(|| CaptureError::Lookup(camera.name().to_string()))?;

        let (width, height) = camera.resolution();
        let backend = &mut self.backend;
        let renderer = self
            .renderers
            .get_or_try_insert_with(camera.name(), || backend.create_renderer(width, height))?;

        let color = backend.render_color(renderer, camera_id)?;
        let metric = backend.render_depth(renderer, camera_id)?;

        if color.width != width || color.height != height {
            return Err(CaptureError::InvalidFrame(format!(
                "camera '{}': color is {}x{}, expected {}x{}",
                camera.name(),
                color.width,
                color.height,
                width,
                height
            )));
        }

        let expected = width as usize * height as usize;
        if metric.len() != expected {
            return Err(CaptureError::InvalidFrame(format!(
                "camera '{}': depth has {} samples, expected {}x{} = {}",
                camera.name(),
                metric.len(),
                width,
                height,
                expected
            )));
        }

        let depth = DepthImage::<u16>::quantize(width, height, &metric, camera.depth_scale())?;
        match depth.valid_range() {
            Some((min, max)) => {
                log::debug!("Camera '{}' depth min: {}, max: {}", camera.name(), min, max)
            }
            None => log::debug!("Camera '{}' sees no valid depth", camera.name()),
        }

        Ok(CaptureFrame {
            camera: camera.name().to_string(),
            color,
            depth,
            depth_scale: camera.depth_scale(),
        })
    }

    /// Capture every camera in order, stopping at the first failure
    pub fn capture_all<'a>(
        &mut self,
        cameras: impl IntoIterator<Item = &'a Camera>,
    ) -> Result<Vec<CaptureFrame>, CaptureError> {
        cameras.into_iter().map(|c| self.capture(c)).collect()
    }
}
