//! Captured frames and their PNG persistence
//!
//! Color is stored as RGB8. Depth is stored fixed-point in a 16-bit
//! grayscale PNG so the samples survive the round trip unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Luma, Rgb};

use rgbdsim_core::{Camera, DepthImage, PointCloud};

use crate::error::CaptureError;

/// Row-major RGB8 image
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    /// Raw RGB pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ColorImage {
    /// Wrap an RGB8 buffer; its length must be `width * height * 3`
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CaptureError::InvalidFrame(format!(
                "color buffer has {} bytes, expected {}x{}x3 = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 3]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 3);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }
        Self { data, width, height }
    }

    /// Pixel at column `u`, row `v`
    pub fn pixel(&self, u: u32, v: u32) -> Option<[u8; 3]> {
        if u >= self.width || v >= self.height {
            return None;
        }
        let i = (v as usize * self.width as usize + u as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), CaptureError> {
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
                CaptureError::InvalidFrame("color buffer smaller than its dimensions".to_string())
            })?;
        buffer.save(path)?;
        Ok(())
    }

    /// Load any image file, converting to RGB8
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            data: rgb.into_raw(),
            width,
            height,
        })
    }
}

/// Write a fixed-point depth image as 16-bit grayscale PNG
pub fn save_depth_png<P: AsRef<Path>>(depth: &DepthImage<u16>, path: P) -> Result<(), CaptureError> {
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(depth.width(), depth.height(), depth.as_slice().to_vec())
            .ok_or_else(|| {
                CaptureError::InvalidFrame("depth buffer smaller than its dimensions".to_string())
            })?;
    buffer.save(path)?;
    Ok(())
}

/// Read a 16-bit grayscale depth PNG
///
/// 8-bit or color images are rejected rather than rescaled, since their
/// samples are not fixed-point depth.
pub fn load_depth_png<P: AsRef<Path>>(path: P) -> Result<DepthImage<u16>, CaptureError> {
    let path = path.as_ref();
    match image::open(path)? {
        DynamicImage::ImageLuma16(buffer) => {
            let (width, height) = buffer.dimensions();
            Ok(DepthImage::new(width, height, buffer.into_raw())?)
        }
        other => Err(CaptureError::InvalidFrame(format!(
            "{} is {:?}, expected 16-bit grayscale depth",
            path.display(),
            other.color()
        ))),
    }
}

/// Files written by [`CaptureFrame::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct FramePaths {
    pub color: PathBuf,
    pub depth: PathBuf,
}

/// One RGB-D capture from a named camera
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFrame {
    /// Name of the camera that produced the frame
    pub camera: String,
    pub color: ColorImage,
    /// Fixed-point depth (metric depth times `depth_scale`)
    pub depth: DepthImage<u16>,
    pub depth_scale: f64,
}

impl CaptureFrame {
    /// Back-project the depth channel through `camera`'s intrinsics
    ///
    /// Points are in the camera's optical frame.
    pub fn point_cloud(&self, camera: &Camera) -> PointCloud {
        camera.point_cloud(&self.depth)
    }

    /// Write `<camera>_color.png` and `<camera>_depth.png` into `dir`
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<FramePaths, CaptureError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let paths = FramePaths {
            color: dir.join(format!("{}_color.png", self.camera)),
            depth: dir.join(format!("{}_depth.png", self.camera)),
        };
        self.color.save_png(&paths.color)?;
        save_depth_png(&self.depth, &paths.depth)?;

        log::info!(
            "Saved frame for '{}' to {} and {}",
            self.camera,
            paths.color.display(),
            paths.depth.display()
        );
        Ok(paths)
    }
}
