use glam::Vec3;
use latticewalk_common::PhysicsConfig;
use latticewalk_input::MoveIntent;
use std::f32::consts::FRAC_PI_2;

/// Per-frame kinematics: walking relative to yaw, gravity, terminal speed.
///
/// Grounded/airborne is not stored here; the caller probes every frame and
/// passes the answer in.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionIntegrator {
    pub physics: PhysicsConfig,
}

impl MotionIntegrator {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self { physics }
    }

    /// Delta actually integrated. Unclamped unless `max_frame_delta` is set.
    pub fn effective_delta(&self, delta: f32) -> f32 {
        match self.physics.max_frame_delta {
            Some(max) => delta.min(max),
            None => delta,
        }
    }

    /// Horizontal displacement for one frame.
    ///
    /// Diagonal input is not normalized: walk and strafe add at full speed.
    pub fn horizontal(&self, intent: MoveIntent, yaw: f32, delta: f32) -> Vec3 {
        let step = self.physics.walk_speed * delta;
        let walk = Vec3::new(yaw.sin(), 0.0, yaw.cos()) * (step * -f32::from(intent.walk));
        let side = yaw + FRAC_PI_2;
        let strafe = Vec3::new(side.sin(), 0.0, side.cos()) * (step * f32::from(intent.strafe));
        walk + strafe
    }

    /// Vertical velocity after this frame.
    pub fn vertical_velocity(&self, velocity: f32, grounded: bool, delta: f32) -> f32 {
        if grounded {
            0.0
        } else {
            (velocity - self.physics.gravity * delta).max(self.physics.terminal_velocity)
        }
    }

    /// Camera height above the feet, with a bob while movement keys are held.
    pub fn eye_height(&self, elapsed: f32, intent: MoveIntent) -> f32 {
        let p = &self.physics;
        p.eye_height + (elapsed * p.bob_frequency).sin() * intent.magnitude() * p.bob_amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn integrator() -> MotionIntegrator {
        MotionIntegrator::default()
    }

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn forward_at_zero_yaw_is_negative_z() {
        let d = integrator().horizontal(MoveIntent::new(1, 0), 0.0, 0.1);
        assert_vec_near(d, Vec3::new(0.0, 0.0, -0.4));
        assert!((d.length() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn backward_is_positive_z() {
        let d = integrator().horizontal(MoveIntent::new(-1, 0), 0.0, 0.5);
        assert_vec_near(d, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn strafe_right_is_positive_x() {
        let d = integrator().horizontal(MoveIntent::new(0, 1), 0.0, 1.0);
        assert_vec_near(d, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn forward_follows_yaw() {
        // Turned a quarter left: forward points along -X.
        let d = integrator().horizontal(MoveIntent::new(1, 0), PI / 2.0, 1.0);
        assert_vec_near(d, Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn diagonal_is_not_normalized() {
        let d = integrator().horizontal(MoveIntent::new(1, 1), 0.0, 1.0);
        assert!((d.length() - 4.0 * 2f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn idle_has_no_displacement() {
        let d = integrator().horizontal(MoveIntent::IDLE, 1.3, 0.25);
        assert_eq!(d.length(), 0.0);
    }

    #[test]
    fn grounded_resets_velocity() {
        assert_eq!(integrator().vertical_velocity(-35.0, true, 0.016), 0.0);
    }

    #[test]
    fn gravity_accumulates() {
        let v = integrator().vertical_velocity(0.0, false, 1.0);
        assert!((v + 9.81).abs() < 1e-6);
    }

    #[test]
    fn terminal_velocity_clamps_large_steps() {
        let v = integrator().vertical_velocity(0.0, false, 10.0);
        assert_eq!(v, -80.0);
    }

    #[test]
    fn delta_unclamped_by_default() {
        assert_eq!(integrator().effective_delta(5.0), 5.0);
    }

    #[test]
    fn delta_clamped_when_configured() {
        let m = MotionIntegrator::new(PhysicsConfig {
            max_frame_delta: Some(0.1),
            ..PhysicsConfig::default()
        });
        assert_eq!(m.effective_delta(5.0), 0.1);
        assert_eq!(m.effective_delta(0.05), 0.05);
    }

    #[test]
    fn bob_only_while_moving() {
        let m = integrator();
        assert_eq!(m.eye_height(0.3, MoveIntent::IDLE), 2.0);

        let t = PI / 2.0 / 12.5;
        let h = m.eye_height(t, MoveIntent::new(1, 0));
        assert!((h - 2.07).abs() < 1e-5);
    }
}
