//! I/O operations for pano3d
//!
//! This crate reads PLY point clouds and binary glTF meshes and re-exports
//! meshes as OBJ or PLY, including the format converter used by the
//! download endpoint of the conversion service.

pub mod convert;
pub mod glb;
pub mod obj;
pub mod ply;

#[cfg(test)]
pub(crate) mod test_util;

pub use convert::{convert_model, ModelFormat};
pub use glb::GlbReader;
pub use obj::ObjWriter;
pub use ply::{PlyReader, PlyWriter};

use pano3d_core::{PointCloud, Result};
use std::path::Path;

/// Read a point cloud, dispatching on the file extension
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => PlyReader::read_point_cloud(path),
        other => Err(pano3d_core::Error::UnsupportedFormat(format!(
            "Unsupported point cloud format: {:?}",
            other
        ))),
    }
}
