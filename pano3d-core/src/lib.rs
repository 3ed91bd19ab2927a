//! Core data structures for pano3d
//!
//! This crate provides the shared types for the pano3d tools: point clouds,
//! triangle meshes, camera pose/intrinsics and the common error type.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod point_cloud;

pub use camera::*;
pub use error::*;
pub use mesh::*;
pub use point_cloud::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Common result type for pano3d operations
pub type Result<T> = std::result::Result<T, Error>;
