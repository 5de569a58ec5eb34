use glam::{Mat4, Vec3};

use crate::types::CameraUniform;

/// Camera placement for one frame: where it sits and what it faces.
///
/// Derived by the flight controller from two curve samples every tick;
/// never stored across frames, so orientation cannot drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Perspective camera fed by the flight controller's per-frame pose.
pub struct Camera {
    position: Vec3,
    look_at: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    width: f32,
    height: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, near: f32, far: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            fov_y: fov_degrees.to_radians(),
            near,
            far,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Applies this frame's pose. A degenerate pose (look-at coinciding with
    /// the position) is ignored and the previous orientation kept; the next
    /// tick overwrites it anyway.
    pub fn set_pose(&mut self, pose: CameraPose) {
        if pose.position.distance_squared(pose.look_at) < 1e-12 {
            self.position = pose.position;
            return;
        }
        self.position = pose.position;
        self.look_at = pose.look_at;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// World up, unless the camera looks straight along it.
    fn up(&self) -> Vec3 {
        let forward = (self.look_at - self.position).normalize_or_zero();
        if forward.dot(Vec3::Y).abs() > 0.999 {
            Vec3::Z
        } else {
            Vec3::Y
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up())
    }

    /// View-projection for the GPU uniform (wgpu clips depth to [0, 1]).
    pub fn view_proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far) * self.view()
    }

    /// Projects a world point to normalized device coordinates with the
    /// symmetric [-1, 1] depth range the overlay visibility test is defined
    /// over. Returns `None` when the perspective divide is degenerate (the
    /// point sits on the camera) instead of producing NaN.
    pub fn project_ndc(&self, world: Vec3) -> Option<Vec3> {
        let proj = Mat4::perspective_rh_gl(self.fov_y, self.aspect(), self.near, self.far);
        let clip = proj * self.view() * world.extend(1.0);
        if clip.w.abs() < 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.is_finite() {
            Some(ndc)
        } else {
            None
        }
    }

    pub fn to_uniform(&self, fog_density: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: self.position.to_array(),
            fog_density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        let mut camera = Camera::new(75.0, 0.1, 1000.0, 800.0, 600.0);
        camera.set_pose(CameraPose {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
        });
        camera
    }

    #[test]
    fn point_ahead_lands_in_ndc_cube() {
        let camera = test_camera();
        let ndc = camera.project_ndc(Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_falls_outside_depth_range() {
        let camera = test_camera();
        let ndc = camera.project_ndc(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert!(ndc.z <= -1.0 || ndc.z >= 1.0);
    }

    #[test]
    fn point_at_camera_is_degenerate() {
        let camera = test_camera();
        assert!(camera.project_ndc(Vec3::ZERO).is_none());
    }

    #[test]
    fn point_beyond_far_plane_is_out_of_range() {
        let camera = test_camera();
        let ndc = camera.project_ndc(Vec3::new(0.0, 0.0, -5000.0)).unwrap();
        assert!(ndc.z >= 1.0);
    }

    #[test]
    fn degenerate_pose_keeps_previous_orientation() {
        let mut camera = test_camera();
        let before = camera.view();
        camera.set_pose(CameraPose {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
        });
        assert_eq!(camera.view(), before);
    }

    #[test]
    fn vertical_forward_still_builds_finite_view() {
        let mut camera = test_camera();
        camera.set_pose(CameraPose {
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 5.0, 0.0),
        });
        let view = camera.view();
        assert!(view.is_finite());
    }

    #[test]
    fn uniform_carries_position_and_fog() {
        let camera = test_camera();
        let uniform = camera.to_uniform(0.3);
        assert_eq!(uniform.position, [0.0, 0.0, 0.0]);
        assert_eq!(uniform.fog_density, 0.3);
    }
}
