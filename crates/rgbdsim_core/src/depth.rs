//! Depth images and back-projection
//!
//! Captured depth is stored fixed-point: metric depth times the camera's
//! depth scale, truncated to `u16`. Back-projection divides the scale back out
//! and lifts every pixel with positive depth into the optical frame:
//!
//! ```text
//! z = d_raw / depth_scale
//! x = (u - cx) * z / fx
//! y = (v - cy) * z / fy
//! ```

use rgbdsim_math::Vec3;

use crate::camera::Intrinsics;
use crate::error::SceneError;

/// Row-major depth buffer, `data[v * width + u]`
#[derive(Clone, Debug, PartialEq)]
pub struct DepthImage<T = u16> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy> DepthImage<T> {
    /// Wrap a buffer; its length must be `width * height`
    pub fn new(width: u32, height: u32, data: Vec<T>) -> Result<Self, SceneError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SceneError::config(format!(
                "depth buffer has {} samples, expected {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Image filled with one value
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Build an image by evaluating `f(u, v)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for v in 0..height {
            for u in 0..width {
                data.push(f(u, v));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at column `u`, row `v`
    pub fn get(&self, u: u32, v: u32) -> Option<T> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.data.get(v as usize * self.width as usize + u as usize).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl DepthImage<u16> {
    /// Convert metric depth into fixed-point samples
    ///
    /// Negative inputs clamp to zero; values past `u16::MAX` saturate.
    pub fn quantize(
        width: u32,
        height: u32,
        metric: &[f32],
        depth_scale: f64,
    ) -> Result<Self, SceneError> {
        let data = metric
            .iter()
            .map(|&d| quantize_sample(d, depth_scale))
            .collect();
        Self::new(width, height, data)
    }

    /// Smallest and largest nonzero sample, if any
    pub fn valid_range(&self) -> Option<(u16, u16)> {
        let mut valid = self.data.iter().copied().filter(|&d| d > 0);
        let first = valid.next()?;
        Some(valid.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

/// Metric depth (meters) to fixed-point, truncating toward zero
pub fn quantize_sample(meters: f32, depth_scale: f64) -> u16 {
    let clamped = f64::from(meters).max(0.0);
    // `as` saturates at the u16 bounds and maps NaN to 0.
    (clamped * depth_scale) as u16
}

/// Lazy iterator over the optical-frame points of a depth image
///
/// Yields one point per pixel with strictly positive depth, in raster order.
/// Iterating again means calling [`back_project`] again on the same image.
pub struct BackProjection<'a, T> {
    depth: &'a DepthImage<T>,
    intrinsics: Intrinsics,
    depth_scale: f64,
    index: usize,
}

impl<'a, T> BackProjection<'a, T>
where
    T: Copy + Into<f64>,
{
    /// `depth_scale` must already be finite and positive
    pub(crate) fn new(depth: &'a DepthImage<T>, intrinsics: Intrinsics, depth_scale: f64) -> Self {
        Self {
            depth,
            intrinsics,
            depth_scale,
            index: 0,
        }
    }
}

impl<T> Iterator for BackProjection<'_, T>
where
    T: Copy + Into<f64>,
{
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        let width = self.depth.width as usize;
        let data = &self.depth.data;
        while self.index < data.len() {
            let i = self.index;
            self.index += 1;

            let z = data[i].into() / self.depth_scale;
            if !(z > 0.0) {
                continue;
            }

            let u = (i % width) as f64;
            let v = (i / width) as f64;
            let k = &self.intrinsics;
            return Some(Vec3::new((u - k.cx) * z / k.fx, (v - k.cy) * z / k.fy, z));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.depth.data.len() - self.index))
    }
}

/// Back-project `depth` with explicit intrinsics and depth scale
///
/// `depth_scale` must be finite and positive.
pub fn back_project<T>(
    depth: &DepthImage<T>,
    intrinsics: Intrinsics,
    depth_scale: f64,
) -> Result<BackProjection<'_, T>, SceneError>
where
    T: Copy + Into<f64>,
{
    if !(depth_scale.is_finite() && depth_scale > 0.0) {
        return Err(SceneError::config(format!(
            "depth_scale must be finite and positive, got {}",
            depth_scale
        )));
    }
    Ok(BackProjection::new(depth, intrinsics, depth_scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intrinsics() -> Intrinsics {
        Intrinsics::from_fovy(60.0, 4, 3)
    }

    #[test]
    fn test_new_checks_length() {
        assert!(DepthImage::new(2, 2, vec![0u16; 4]).is_ok());
        assert!(matches!(
            DepthImage::new(2, 2, vec![0u16; 3]),
            Err(SceneError::Configuration(_))
        ));
    }

    #[test]
    fn test_get_is_row_major() {
        let img = DepthImage::from_fn(3, 2, |u, v| (v * 10 + u) as u16);
        assert_eq!(img.get(2, 1), Some(12));
        assert_eq!(img.get(0, 1), Some(10));
        assert_eq!(img.get(3, 0), None);
    }

    #[test]
    fn test_quantize_sample() {
        assert_eq!(quantize_sample(2.5, 1000.0), 2500);
        assert_eq!(quantize_sample(0.0012345, 1000.0), 1);
        assert_eq!(quantize_sample(-1.0, 1000.0), 0);
        assert_eq!(quantize_sample(f32::NAN, 1000.0), 0);
        assert_eq!(quantize_sample(100.0, 1000.0), u16::MAX);
    }

    #[test]
    fn test_quantize_image() {
        let img = DepthImage::<u16>::quantize(2, 1, &[2.5, 0.75], 1000.0).unwrap();
        assert_eq!(img.as_slice(), &[2500, 750]);
        assert!(DepthImage::<u16>::quantize(2, 2, &[1.0], 1000.0).is_err());
    }

    #[test]
    fn test_valid_range() {
        let img = DepthImage::new(4, 1, vec![0u16, 900, 300, 0]).unwrap();
        assert_eq!(img.valid_range(), Some((300, 900)));
        assert_eq!(DepthImage::filled(2, 2, 0u16).valid_range(), None);
    }

    #[test]
    fn test_skips_non_positive_depth() {
        let img = DepthImage::new(4, 3, vec![
            0.0f32, 1.0, -1.0, 2.0,
            0.0, 0.0, 0.0, 0.0,
            3.0, f32::NAN, 0.5, 0.0,
        ])
        .unwrap();
        let points: Vec<Vec3> = back_project(&img, intrinsics(), 1.0).unwrap().collect();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.z > 0.0));
    }

    #[test]
    fn test_depth_scale_divided_out() {
        let img = DepthImage::new(1, 1, vec![2500u16]).unwrap();
        let k = Intrinsics::from_fovy(60.0, 1, 1);
        let p = back_project(&img, k, 1000.0).unwrap().next().unwrap();
        assert_eq!(p.z, 2.5);
    }

    #[test]
    fn test_restartable() {
        let img = DepthImage::filled(4, 3, 1000u16);
        let first: Vec<Vec3> = back_project(&img, intrinsics(), 1000.0).unwrap().collect();
        let second: Vec<Vec3> = back_project(&img, intrinsics(), 1000.0).unwrap().collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_bad_depth_scale() {
        let img = DepthImage::filled(4, 3, 1000u16);
        for scale in [0.0, -1000.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                back_project(&img, intrinsics(), scale),
                Err(SceneError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_principal_point_on_axis() {
        // Pixel (2, 1) with cx = 2, cy = 1.5 lies on the vertical center line.
        let img = DepthImage::from_fn(4, 3, |u, v| if (u, v) == (2, 1) { 1000u16 } else { 0 });
        let p = back_project(&img, intrinsics(), 1000.0).unwrap().next().unwrap();
        assert_eq!(p.x, 0.0);
        assert!(p.y < 0.0);
        assert_eq!(p.z, 1.0);
    }
}
