use glam::Vec3;
use latticewalk_kernel::FrameReport;

/// Round to two decimals, halves toward positive infinity.
///
/// Negative zero is folded to zero so a resting viewer reads `0`, not `-0`.
pub fn round2(v: f32) -> f32 {
    ((v * 100.0 + 0.5).floor() / 100.0) + 0.0
}

/// The three lines of the on-screen debug display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugReadout {
    pub position: Vec3,
    pub velocity: f32,
    pub delta: f32,
}

impl DebugReadout {
    pub fn new(position: Vec3, velocity: f32, delta: f32) -> Self {
        Self {
            position,
            velocity,
            delta,
        }
    }

    pub fn from_report(report: &FrameReport) -> Self {
        Self::new(report.position, report.velocity, report.delta)
    }

    /// `<x, y, z>` with every component rounded.
    pub fn position_text(&self) -> String {
        let p = self.position;
        format!("<{}, {}, {}>", round2(p.x), round2(p.y), round2(p.z))
    }

    pub fn velocity_text(&self) -> String {
        round2(self.velocity).to_string()
    }

    pub fn delta_text(&self) -> String {
        round2(self.delta).to_string()
    }
}

impl std::fmt::Display for DebugReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "position={} velocity={} delta={}",
            self.position_text(),
            self.velocity_text(),
            self.delta_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latticewalk_render::Scene;
    use latticewalk_common::Settings;
    use latticewalk_input::MoveIntent;
    use latticewalk_kernel::World;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(0.016), 0.02);
        assert_eq!(round2(-9.816), -9.82);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        assert_eq!(round2(-0.001).to_string(), "0");
        assert_eq!(round2(-0.0).to_string(), "0");
    }

    #[test]
    fn position_uses_angle_brackets() {
        let r = DebugReadout::new(Vec3::new(1.25, 1.5, -1.25), 0.0, 0.016);
        assert_eq!(r.position_text(), "<1.25, 1.5, -1.25>");
        assert_eq!(r.velocity_text(), "0");
        assert_eq!(r.delta_text(), "0.02");
    }

    #[test]
    fn display_joins_all_fields() {
        let r = DebugReadout::new(Vec3::new(0.0, 10.19, 3.333), -9.81, 1.0);
        assert_eq!(
            r.to_string(),
            "position=<0, 10.19, 3.33> velocity=-9.81 delta=1"
        );
    }

    #[test]
    fn built_from_frame_report() {
        let mut scene = Scene::new();
        let mut settings = Settings::default();
        settings.lattice.render_distance = 1;
        let mut world = World::new(&settings, &mut scene).unwrap();
        let report = world.step(&mut scene, MoveIntent::IDLE, 0.016).unwrap();

        let r = DebugReadout::from_report(&report);
        assert_eq!(r.position_text(), "<1.25, 1.5, -1.25>");
        assert_eq!(r.velocity_text(), "0");
    }
}
