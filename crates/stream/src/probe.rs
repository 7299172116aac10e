use glam::Vec3;
use latticewalk_common::PhysicsConfig;
use latticewalk_render::{Intersector, Ray, RayHit};

use crate::pool::LatticePool;

/// Short downward ray that decides whether the viewer is standing on the
/// lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// Ray starts this far above the viewer's feet.
    pub lift: f32,
    /// Maximum travel of the ray.
    pub reach: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            lift: 1.0,
            reach: 1.0,
        }
    }
}

impl GroundProbe {
    pub fn from_physics(physics: &PhysicsConfig) -> Self {
        Self {
            lift: physics.probe_lift,
            reach: physics.probe_distance,
        }
    }

    pub fn ray(&self, feet: Vec3) -> Ray {
        Ray::new(feet + Vec3::Y * self.lift, Vec3::NEG_Y)
    }

    /// True iff the ray hits at least one pool element within `reach`.
    ///
    /// Runs against whatever positions the pool last wrote, so recenter first.
    pub fn is_grounded<I: Intersector + ?Sized>(
        &self,
        feet: Vec3,
        pool: &LatticePool,
        intersector: &I,
    ) -> bool {
        intersector.hits_any(self.ray(feet), self.reach, pool.handles())
    }

    /// Every element under the viewer within reach, nearest first.
    pub fn hits<I: Intersector + ?Sized>(
        &self,
        feet: Vec3,
        pool: &LatticePool,
        intersector: &I,
    ) -> Vec<RayHit> {
        intersector.cast_ray(self.ray(feet), self.reach, pool.handles())
    }
}
