//! Point clouds and the `.xyz` text format
//!
//! One point per line, `x y z` in meters, no header.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rgbdsim_math::Vec3;

use crate::error::SceneError;
use crate::fragment::fmt_num;

/// Optical-frame points in raster order of their source pixels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Vec3>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.points.iter()
    }

    pub fn push(&mut self, p: Vec3) {
        self.points.push(p);
    }

    /// Apply `f` to every point, e.g. an optical-to-world transform
    pub fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        self.points.iter().map(|p| f(*p)).collect()
    }

    /// Write in `.xyz` format
    pub fn write_xyz<W: Write>(&self, writer: W) -> io::Result<usize> {
        write_xyz(self.points.iter().copied(), writer)
    }

    pub fn to_xyz_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_xyz(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write to a `.xyz` file
    pub fn save_xyz<P: AsRef<Path>>(&self, path: P) -> Result<usize, SceneError> {
        let file = File::create(path)?;
        Ok(self.write_xyz(BufWriter::new(file))?)
    }
}

impl FromIterator<Vec3> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Vec3;
    type IntoIter = std::slice::Iter<'a, Vec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Stream points to `writer` in `.xyz` format, returning the point count
///
/// Accepts any iterator, so a lazy back-projection can be written without
/// collecting it first.
pub fn write_xyz<I, W>(points: I, writer: W) -> io::Result<usize>
where
    I: IntoIterator<Item = Vec3>,
    W: Write,
{
    let mut writer = writer;
    let mut count = 0;
    for p in points {
        writeln!(writer, "{} {} {}", fmt_num(p.x), fmt_num(p.y), fmt_num(p.z))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xyz_format() {
        let cloud: PointCloud = vec![Vec3::new(0.0, -0.5, 2.5), Vec3::new(0.1, 0.2, 1.0)]
            .into_iter()
            .collect();
        assert_eq!(cloud.to_xyz_string(), "0.0 -0.5 2.5\n0.1 0.2 1.0\n");
    }

    #[test]
    fn test_empty_cloud_writes_nothing() {
        let cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert_eq!(cloud.to_xyz_string(), "");
    }

    #[test]
    fn test_write_xyz_counts_points() {
        let mut buf = Vec::new();
        let n = write_xyz((0..3).map(|i| Vec3::new(i as f64, 0.0, 1.0)), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_map() {
        let cloud: PointCloud = std::iter::once(Vec3::new(1.0, 2.0, 3.0)).collect();
        let shifted = cloud.map(|p| p + Vec3::Z);
        assert_eq!(shifted.points(), &[Vec3::new(1.0, 2.0, 4.0)]);
    }

    #[test]
    fn test_save_xyz() {
        let path = std::env::temp_dir().join(format!("rgbdsim_cloud_{}.xyz", std::process::id()));
        let cloud: PointCloud = std::iter::once(Vec3::new(0.25, 0.5, 0.75)).collect();
        assert_eq!(cloud.save_xyz(&path).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0.25 0.5 0.75\n");
        let _ = std::fs::remove_file(&path);
    }
}
