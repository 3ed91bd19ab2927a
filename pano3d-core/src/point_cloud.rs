//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A point cloud stored as parallel columns: positions plus optional
/// per-point colors and normals.
///
/// When a color or normal column is present it has exactly one entry per
/// position; the attach methods enforce this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointCloud {
    positions: Vec<Point3<f32>>,
    colors: Option<Vec<[f32; 3]>>,
    normals: Option<Vec<Vector3<f32>>>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud from a vector of positions
    pub fn from_positions(positions: Vec<Point3<f32>>) -> Self {
        Self {
            positions,
            colors: None,
            normals: None,
        }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions of all points
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    /// Per-point RGB colors in [0,1], if present
    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    /// Per-point normals, if present
    pub fn normals(&self) -> Option<&[Vector3<f32>]> {
        self.normals.as_deref()
    }

    /// Attach a color column. Fails unless it has one entry per position.
    pub fn set_colors(&mut self, colors: Vec<[f32; 3]>) -> Result<()> {
        if colors.len() != self.positions.len() {
            return Err(Error::InvalidData(format!(
                "color count {} does not match point count {}",
                colors.len(),
                self.positions.len()
            )));
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Attach a normal column. Fails unless it has one entry per position.
    pub fn set_normals(&mut self, normals: Vec<Vector3<f32>>) -> Result<()> {
        if normals.len() != self.positions.len() {
            return Err(Error::InvalidData(format!(
                "normal count {} does not match point count {}",
                normals.len(),
                self.positions.len()
            )));
        }
        self.normals = Some(normals);
        Ok(())
    }

    /// Negate every position in place.
    ///
    /// Used to turn an outside-in capture into panoramic content that
    /// surrounds the camera. Applying it twice restores the original cloud.
    pub fn invert(&mut self) {
        for p in &mut self.positions {
            p.coords = -p.coords;
        }
    }

    /// Select a subset of points by index, preserving the pairing between
    /// positions, colors and normals.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            positions: indices.iter().map(|&i| self.positions[i]).collect(),
            colors: self
                .colors
                .as_ref()
                .map(|c| indices.iter().map(|&i| c[i]).collect()),
            normals: self
                .normals
                .as_ref()
                .map(|n| indices.iter().map(|&i| n[i]).collect()),
        }
    }

    /// Axis-aligned bounding box, or `None` for an empty cloud
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Center of the bounding box
    pub fn center(&self) -> Option<Point3<f32>> {
        self.bounding_box().map(|(min, max)| {
            Point3::new(
                (min.x + max.x) / 2.0,
                (min.y + max.y) / 2.0,
                (min.z + max.z) / 2.0,
            )
        })
    }

    /// Extent of the bounding box along each axis
    pub fn extent(&self) -> Option<Vector3<f32>> {
        self.bounding_box().map(|(min, max)| max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_cloud() -> PointCloud {
        let mut cloud = PointCloud::from_positions(vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.0, 0.5, 0.0),
            Point3::new(0.0, -1.0, 2.5),
        ]);
        cloud
            .set_colors(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap();
        cloud
    }

    #[test]
    fn test_double_inversion_restores_positions() {
        let original = sample_cloud();
        let mut cloud = original.clone();

        cloud.invert();
        for (inv, orig) in cloud.positions().iter().zip(original.positions()) {
            assert_relative_eq!(inv.coords, -orig.coords);
        }

        cloud.invert();
        for (restored, orig) in cloud.positions().iter().zip(original.positions()) {
            assert_relative_eq!(restored.coords, orig.coords);
        }
    }

    #[test]
    fn test_select_preserves_pairing() {
        let cloud = sample_cloud();
        let subset = cloud.select(&[2, 0]);

        assert_eq!(subset.len(), 2);
        assert_eq!(subset.positions()[0], cloud.positions()[2]);
        assert_eq!(subset.positions()[1], cloud.positions()[0]);
        let colors = subset.colors().unwrap();
        assert_eq!(colors[0], [0.0, 0.0, 1.0]);
        assert_eq!(colors[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_color_length_mismatch_rejected() {
        let mut cloud = sample_cloud();
        assert!(cloud.set_colors(vec![[0.0, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn test_bounding_box() {
        let cloud = sample_cloud();
        let (min, max) = cloud.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-4.0, -1.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 2.0, 3.0));

        let center = cloud.center().unwrap();
        assert_relative_eq!(center.x, -1.5);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(center.z, 1.5);
    }

    #[test]
    fn test_empty_cloud_has_no_bounds() {
        assert!(PointCloud::new().bounding_box().is_none());
    }
}
