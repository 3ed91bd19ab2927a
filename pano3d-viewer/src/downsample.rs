//! Random point cloud downsampling

use pano3d_core::PointCloud;
use rand::seq::index;
use rand::Rng;

/// Reduce a cloud to at most `target` points by uniform random selection
/// without replacement.
///
/// Clouds already at or below the target are returned unchanged. Selection
/// is not seeded, so results differ between runs.
pub fn downsample(cloud: PointCloud, target: usize) -> PointCloud {
    downsample_with_rng(cloud, target, &mut rand::thread_rng())
}

/// Downsample with a caller-provided random source
pub fn downsample_with_rng<R: Rng + ?Sized>(
    cloud: PointCloud,
    target: usize,
    rng: &mut R,
) -> PointCloud {
    if cloud.len() <= target {
        return cloud;
    }
    let indices = index::sample(rng, cloud.len(), target).into_vec();
    cloud.select(&indices)
}
