use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Where the viewer spawns: just above the platform at the origin.
pub const SPAWN_POSITION: Vec3 = Vec3::new(1.25, 1.5, -1.25);

/// The first-person body moved by the motion integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    /// Feet position in world space.
    pub position: Vec3,
    /// Vertical speed, negative while falling.
    pub vertical_velocity: f32,
    /// Rotation about +Y in radians. Zero faces -Z.
    pub yaw: f32,
    /// Look up/down in radians. Presentational only.
    pub pitch: f32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::at(SPAWN_POSITION)
    }
}

impl Viewer {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Apply pointer motion. Moving right turns right, moving down looks down.
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_at_origin_platform() {
        let v = Viewer::default();
        assert_eq!(v.position, Vec3::new(1.25, 1.5, -1.25));
        assert_eq!(v.vertical_velocity, 0.0);
        assert_eq!(v.yaw, 0.0);
    }

    #[test]
    fn look_right_decreases_yaw() {
        let mut v = Viewer::default();
        v.look(100.0, 0.0, 0.01);
        assert!((v.yaw + 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut v = Viewer::default();
        v.look(0.0, -10_000.0, 0.01);
        assert_eq!(v.pitch, FRAC_PI_2);
        v.look(0.0, 10_000.0, 0.01);
        assert_eq!(v.pitch, -FRAC_PI_2);
    }
}
