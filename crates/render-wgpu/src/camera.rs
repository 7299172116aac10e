use glam::{Mat4, Quat, Vec3};
use latticewalk_render::RenderView;

/// Perspective camera driven by a `RenderView`.
///
/// The view matrix is built from yaw then pitch rotations rather than a
/// look-at, so looking straight up or down stays well defined.
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    pub view: RenderView,
    pub aspect: f32,
}

impl ViewCamera {
    pub fn new(view: RenderView, width: u32, height: u32) -> Self {
        Self {
            view,
            aspect: aspect_ratio(width, height),
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.view.yaw) * Quat::from_rotation_x(self.view.pitch)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.view.eye).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.view.fov_degrees.to_radians(),
            self.aspect,
            self.view.near,
            self.view.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
