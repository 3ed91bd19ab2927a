//! Scene composition: cloud, overlays and render options

use crate::render::{LineVertex, PointInstance};
use pano3d_core::PointCloud;
use tracing::info;

/// Color used for points when the file carries no color attribute
const DEFAULT_POINT_COLOR: [f32; 3] = [0.9, 0.9, 0.9];

/// Color used for normal overlay segments
const NORMAL_COLOR: [f32; 3] = [0.8, 0.8, 0.2];

/// Everything the renderer needs to draw one static cloud
pub struct Scene {
    pub cloud: PointCloud,
    pub point_size: f32,
    pub background: [f64; 4],
    pub show_axis: bool,
    pub show_normals: bool,
}

impl Scene {
    pub fn new(
        cloud: PointCloud,
        point_size: f32,
        background: [f64; 4],
        show_axis: bool,
        show_normals: bool,
    ) -> Self {
        Self {
            cloud,
            point_size,
            background,
            show_axis,
            show_normals,
        }
    }

    /// Log point count and bounding box, as shown before the window opens
    pub fn log_bounds(&self) {
        info!(points = self.cloud.len(), "point cloud ready");
        if let (Some(center), Some(extent)) = (self.cloud.center(), self.cloud.extent()) {
            info!(
                center = format!("[{:.3}, {:.3}, {:.3}]", center.x, center.y, center.z),
                extent = format!("[{:.3}, {:.3}, {:.3}]", extent.x, extent.y, extent.z),
                "bounding box"
            );
        }
    }

    /// Per-point instance data for the point pipeline
    pub fn point_instances(&self) -> Vec<PointInstance> {
        let colors = self.cloud.colors();
        self.cloud
            .positions()
            .iter()
            .enumerate()
            .map(|(i, p)| PointInstance {
                position: [p.x, p.y, p.z],
                color: colors.map_or(DEFAULT_POINT_COLOR, |c| c[i]),
            })
            .collect()
    }

    /// Vertices for the line pipeline: axis triad plus normal overlays
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut lines = Vec::new();
        let diagonal = self
            .cloud
            .extent()
            .map_or(2.0, |e| e.norm())
            .max(f32::EPSILON);

        if self.show_axis {
            let axis_len = (diagonal * 0.1).max(0.5);
            let axes = [
                ([axis_len, 0.0, 0.0], [1.0, 0.0, 0.0]),
                ([0.0, axis_len, 0.0], [0.0, 1.0, 0.0]),
                ([0.0, 0.0, axis_len], [0.0, 0.0, 1.0]),
            ];
            for (tip, color) in axes {
                lines.push(LineVertex {
                    position: [0.0, 0.0, 0.0],
                    color,
                });
                lines.push(LineVertex {
                    position: tip,
                    color,
                });
            }
        }

        if self.show_normals {
            if let Some(normals) = self.cloud.normals() {
                let segment = diagonal * 0.01;
                for (p, n) in self.cloud.positions().iter().zip(normals) {
                    lines.push(LineVertex {
                        position: [p.x, p.y, p.z],
                        color: NORMAL_COLOR,
                    });
                    lines.push(LineVertex {
                        position: [
                            p.x + n.x * segment,
                            p.y + n.y * segment,
                            p.z + n.z * segment,
                        ],
                        color: NORMAL_COLOR,
                    });
                }
            }
        }

        lines
    }
}
