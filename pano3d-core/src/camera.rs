//! Camera pose, pinhole intrinsics and the horizontal rotation lock

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Guard against division by zero when renormalizing a squashed axis
const AXIS_EPSILON: f32 = 1e-10;

/// Pinhole camera intrinsics: image resolution, focal lengths and
/// principal point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    pub width: u32,
    pub height: u32,
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeIntrinsics {
    /// Derive intrinsics from a horizontal field-of-view angle.
    ///
    /// `fx = fy = width / (2 * tan(fov / 2))`, principal point at the image
    /// center. No bound check is applied: `fov_degrees >= 180` yields a
    /// non-positive or infinite focal length.
    pub fn from_fov(width: u32, height: u32, fov_degrees: f32) -> Self {
        let focal = width as f32 / (2.0 * (fov_degrees.to_radians() / 2.0).tan());
        Self {
            width,
            height,
            fx: focal,
            fy: focal,
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
        }
    }

    /// Projection matrix mapping camera space (x right, y down, z forward)
    /// to wgpu clip space with depth in [0,1]
    pub fn projection_matrix(&self, near: f32, far: f32) -> Matrix4<f32> {
        let w = self.width as f32;
        let h = self.height as f32;
        let mut proj = Matrix4::zeros();
        proj[(0, 0)] = 2.0 * self.fx / w;
        proj[(0, 2)] = 2.0 * self.cx / w - 1.0;
        proj[(1, 1)] = -2.0 * self.fy / h;
        proj[(1, 2)] = 1.0 - 2.0 * self.cy / h;
        proj[(2, 2)] = far / (far - near);
        proj[(2, 3)] = -far * near / (far - near);
        proj[(3, 2)] = 1.0;
        proj
    }
}

/// A world-to-camera rigid transform.
///
/// `x_cam = rotation * x_world + translation`; the rotation block stays
/// orthonormal through every operation here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub rotation: Matrix3<f32>,
    pub translation: Vector3<f32>,
}

impl CameraPose {
    /// Identity pose: camera at the origin, no rotation
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Camera placed at `(0, 0, distance)` with identity rotation, facing
    /// along the cloud's natural axis
    pub fn looking_from_distance(distance: f32) -> Self {
        let rotation = Matrix3::identity();
        Self {
            rotation,
            translation: -(rotation * Vector3::new(0.0, 0.0, distance)),
        }
    }

    /// Homogeneous view matrix `[R | t]`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let mut view = Matrix4::identity();
        view.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        view.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&self.translation);
        view
    }

    /// Camera center in world coordinates: `-R^T * t`
    pub fn camera_position(&self) -> Point3<f32> {
        Point3::from(-(self.rotation.transpose() * self.translation))
    }

    /// Rotate the view about the world vertical axis, keeping the camera
    /// center fixed
    pub fn yaw(&mut self, angle: f32) {
        let center = self.camera_position();
        let rot = Rotation3::from_axis_angle(&Vector3::y_axis(), angle).into_inner();
        self.rotation *= rot;
        self.translation = -(self.rotation * center.coords);
    }

    /// Rotate the view about the camera's right axis, keeping the camera
    /// center fixed
    pub fn pitch(&mut self, angle: f32) {
        let center = self.camera_position();
        let rot = Rotation3::from_axis_angle(&Vector3::x_axis(), angle).into_inner();
        self.rotation = rot * self.rotation;
        self.translation = -(self.rotation * center.coords);
    }

    /// Move the camera along its viewing axis
    pub fn dolly(&mut self, amount: f32) {
        self.translation.z -= amount;
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Per-frame correction keeping the camera level.
///
/// Captures the extrinsic height at activation; `apply` forces the height
/// back and projects the rotation onto a horizontally level frame,
/// discarding any pitch or roll introduced that frame. A no-op (up to
/// floating point) when the frame is already level. When the camera looks
/// straight up or down the squashed forward axis is renormalized through a
/// small epsilon; the resulting direction is not well defined but stays
/// finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalLock {
    pub initial_height: f32,
}

impl HorizontalLock {
    /// Capture the lock state from the pose active at enable time
    pub fn capture(pose: &CameraPose) -> Self {
        Self {
            initial_height: pose.translation.y,
        }
    }

    /// Correct one frame's pose in place
    pub fn apply(&self, pose: &mut CameraPose) {
        pose.translation.y = self.initial_height;

        let mut up = pose.rotation.column(1).into_owned();
        up.x = 0.0;
        up.z = 0.0;
        up.y = if up.y < 0.0 { -1.0 } else { 1.0 };

        let mut forward = pose.rotation.column(2).into_owned();
        forward.y = 0.0;
        forward /= forward.norm() + AXIS_EPSILON;

        let mut right = up.cross(&forward);
        right /= right.norm() + AXIS_EPSILON;

        pose.rotation.set_column(0, &right);
        pose.rotation.set_column(1, &up);
        pose.rotation.set_column(2, &forward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(r: &Matrix3<f32>) {
        let product = r * r.transpose();
        assert_relative_eq!(product, Matrix3::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_focal_length_from_fov() {
        let intrinsics = PinholeIntrinsics::from_fov(1000, 800, 90.0);
        assert_relative_eq!(intrinsics.fx, 500.0, epsilon = 1e-3);
        assert_relative_eq!(intrinsics.fy, 500.0, epsilon = 1e-3);
        assert_relative_eq!(intrinsics.cx, 500.0);
        assert_relative_eq!(intrinsics.cy, 400.0);
    }

    #[test]
    fn test_projection_maps_center_ray() {
        let intrinsics = PinholeIntrinsics::from_fov(1000, 800, 90.0);
        let proj = intrinsics.projection_matrix(0.01, 100.0);

        // A point straight ahead projects to the image center
        let clip = proj * nalgebra::Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);

        // fov 90 with fx = w/2 puts x = z on the right clip edge
        let clip = proj * nalgebra::Vector4::new(1.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_looking_from_distance() {
        let pose = CameraPose::looking_from_distance(2.5);
        assert_relative_eq!(pose.rotation, Matrix3::identity());
        let center = pose.camera_position();
        assert_relative_eq!(center.coords, Vector3::new(0.0, 0.0, 2.5), epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_keeps_camera_center() {
        let mut pose = CameraPose::looking_from_distance(3.0);
        pose.yaw(0.7);
        assert_orthonormal(&pose.rotation);
        assert_relative_eq!(
            pose.camera_position().coords,
            Vector3::new(0.0, 0.0, 3.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_lock_is_noop_on_level_frame() {
        let mut pose = CameraPose::looking_from_distance(0.0);
        pose.yaw(1.2);
        let lock = HorizontalLock::capture(&pose);

        let before = pose;
        lock.apply(&mut pose);

        assert_relative_eq!(pose.rotation, before.rotation, epsilon = 1e-5);
        assert_relative_eq!(pose.translation, before.translation, epsilon = 1e-5);
    }

    #[test]
    fn test_lock_levels_pitched_frame() {
        let mut pose = CameraPose::looking_from_distance(0.0);
        let lock = HorizontalLock::capture(&pose);

        pose.pitch(0.4);
        pose.translation.y = 1.5;
        lock.apply(&mut pose);

        assert_orthonormal(&pose.rotation);
        assert_relative_eq!(pose.translation.y, 0.0, epsilon = 1e-6);
        let up = pose.rotation.column(1);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.z, 0.0, epsilon = 1e-6);
        let forward = pose.rotation.column(2);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-6);
    }
}
