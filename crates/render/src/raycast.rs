use crate::scene::{Scene, ShapeHandle};
use glam::Vec3;

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A shape crossed by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub handle: ShapeHandle,
    /// Distance from the ray origin to the entry point.
    pub distance: f32,
    pub point: Vec3,
}

/// Ray queries against registered shapes.
pub trait Intersector {
    /// All candidates the ray enters within `max_distance`, nearest first.
    fn cast_ray(&self, ray: Ray, max_distance: f32, candidates: &[ShapeHandle]) -> Vec<RayHit>;

    /// Whether any candidate is hit. Implementors may stop at the first hit.
    fn hits_any(&self, ray: Ray, max_distance: f32, candidates: &[ShapeHandle]) -> bool {
        !self.cast_ray(ray, max_distance, candidates).is_empty()
    }
}

/// Distance at which `ray` enters the box `[min, max]`.
///
/// Only entry counts: a ray that starts inside the box never reports it, the
/// same way front-face-only picking ignores the face a ray leaves through.
pub fn ray_box_entry(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for i in 0..3 {
        let o = ray.origin[i];
        let d = ray.direction[i];
        if d.abs() < 1e-8 {
            // Parallel to this slab
            if o < min[i] || o > max[i] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[i] - o) * inv;
        let mut t1 = (max[i] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    (t_enter >= 0.0).then_some(t_enter)
}

impl Scene {
    fn entry(&self, ray: &Ray, max_distance: f32, handle: ShapeHandle) -> Option<f32> {
        let node = self.node(handle)?;
        ray_box_entry(ray, node.min(), node.max()).filter(|t| *t <= max_distance)
    }
}

impl Intersector for Scene {
    fn cast_ray(&self, ray: Ray, max_distance: f32, candidates: &[ShapeHandle]) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = candidates
            .iter()
            .filter_map(|&handle| {
                self.entry(&ray, max_distance, handle).map(|distance| RayHit {
                    handle,
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn hits_any(&self, ray: Ray, max_distance: f32, candidates: &[ShapeHandle]) -> bool {
        candidates
            .iter()
            .any(|&handle| self.entry(&ray, max_distance, handle).is_some())
    }
}
