use glam::Vec3;
use latticewalk_common::{Axis, BAR_K, LatticeConfig, LatticeKey};
use latticewalk_render::{BoxGeometry, MaterialHandle, RenderError, SceneGraph, ShapeHandle};

use crate::grid::{ChunkCoord, chunk_of};

/// Errors from lattice pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("lattice key {0} was never registered")]
    KeyNotFound(LatticeKey),
    #[error("scene rejected lattice element: {0}")]
    Scene(#[from] RenderError),
}

/// One pooled shape. Created at preload, moved every frame, never dropped
/// before the pool itself.
#[derive(Debug, Clone, Copy)]
pub struct LatticeElement {
    pub key: LatticeKey,
    pub handle: ShapeHandle,
    /// Displacement from the snapped origin.
    pub offset: Vec3,
    /// World position last written to the scene.
    pub position: Vec3,
}

/// Displacement of `key` from the snapped origin.
///
/// Bars sit on two perpendicular axes and span the third; platforms sit on
/// all three.
pub fn lattice_offset(key: LatticeKey, chunk_size: f32) -> Vec3 {
    let i = key.i as f32 * chunk_size;
    let j = key.j as f32 * chunk_size;
    match key.axis {
        Axis::X => Vec3::new(0.0, i, j),
        Axis::Y => Vec3::new(i, 0.0, j),
        Axis::Z => Vec3::new(i, j, 0.0),
        Axis::Platform => Vec3::new(i, j, key.k as f32 * chunk_size),
    }
}

/// Box used for every element of the given orientation.
pub fn lattice_geometry(axis: Axis, config: &LatticeConfig) -> BoxGeometry {
    let len = config.bar_length();
    let t = config.bar_thickness;
    match axis {
        Axis::X => BoxGeometry::new(len, t, t),
        Axis::Y => BoxGeometry::new(t, len, t),
        Axis::Z => BoxGeometry::new(t, t, len),
        Axis::Platform => BoxGeometry::new(
            config.platform_width,
            config.platform_thickness,
            config.platform_width,
        ),
    }
}

/// Fixed-capacity pool of lattice elements kept centered on the viewer.
///
/// Slots are dense: bars first, ordered by `(i, j, axis)`, then platforms
/// ordered by `(i, j, k)`. A key's slot is computed, never searched.
#[derive(Debug)]
pub struct LatticePool {
    render_distance: i32,
    chunk_size: f32,
    elements: Vec<LatticeElement>,
    handles: Vec<ShapeHandle>,
    origin: Option<ChunkCoord>,
}

impl LatticePool {
    /// Register one shape per lattice key with `scene`.
    ///
    /// This is the only place the pool allocates or touches `create_shape`.
    pub fn preload<S: SceneGraph + ?Sized>(
        config: &LatticeConfig,
        scene: &mut S,
    ) -> Result<Self, PoolError> {
        let _span = tracing::info_span!("lattice_preload").entered();
        let r = config.render_distance;
        let capacity = config.element_count();
        let mut pool = Self {
            render_distance: r,
            chunk_size: config.chunk_size,
            elements: Vec::with_capacity(capacity),
            handles: Vec::with_capacity(capacity),
            origin: None,
        };

        for i in -r..=r {
            for j in -r..=r {
                for axis in Axis::BARS {
                    pool.register(LatticeKey::bar(i, j, axis), config, scene)?;
                }
            }
        }
        for i in -r..=r {
            for j in -r..=r {
                for k in -r..=r {
                    pool.register(LatticeKey::platform(i, j, k), config, scene)?;
                }
            }
        }

        debug_assert_eq!(pool.elements.len(), capacity);
        tracing::info!(
            elements = pool.elements.len(),
            render_distance = r,
            chunk_size = config.chunk_size,
            "lattice preloaded"
        );
        Ok(pool)
    }

    fn register<S: SceneGraph + ?Sized>(
        &mut self,
        key: LatticeKey,
        config: &LatticeConfig,
        scene: &mut S,
    ) -> Result<(), PoolError> {
        debug_assert_eq!(self.slot(key), Some(self.elements.len()));
        let offset = lattice_offset(key, self.chunk_size);
        let handle = scene.create_shape(lattice_geometry(key.axis, config), MaterialHandle::LATTICE);
        scene.set_position(handle, offset)?;
        self.elements.push(LatticeElement {
            key,
            handle,
            offset,
            position: offset,
        });
        self.handles.push(handle);
        Ok(())
    }

    /// Dense slot index of `key`, or `None` if it lies outside the pool.
    pub fn slot(&self, key: LatticeKey) -> Option<usize> {
        let r = self.render_distance;
        let n = (2 * r + 1) as usize;
        let index = |v: i32| (-r..=r).contains(&v).then(|| (v + r) as usize);
        let i = index(key.i)?;
        let j = index(key.j)?;
        match key.axis {
            Axis::Platform => {
                let k = index(key.k)?;
                Some(n * n * 3 + (i * n + j) * n + k)
            }
            bar => {
                if key.k != BAR_K {
                    return None;
                }
                let a = match bar {
                    Axis::X => 0,
                    Axis::Y => 1,
                    _ => 2,
                };
                Some((i * n + j) * 3 + a)
            }
        }
    }

    pub fn contains(&self, key: LatticeKey) -> bool {
        self.slot(key).is_some()
    }

    /// Look up an element by key.
    ///
    /// Every valid key is registered at preload, so a miss means a caller
    /// built a key outside the pool's range. Debug builds panic on it.
    pub fn get(&self, key: LatticeKey) -> Result<&LatticeElement, PoolError> {
        match self.slot(key) {
            Some(slot) => Ok(&self.elements[slot]),
            None => {
                if cfg!(debug_assertions) {
                    panic!("lattice key {key} was never registered");
                }
                Err(PoolError::KeyNotFound(key))
            }
        }
    }

    /// Move every element to `snapped_origin(viewer) + offset`.
    ///
    /// Always touches the whole pool; never allocates. Returns the chunk the
    /// pool is now centered on.
    pub fn recenter<S: SceneGraph + ?Sized>(
        &mut self,
        viewer: Vec3,
        scene: &mut S,
    ) -> Result<ChunkCoord, PoolError> {
        let _span = tracing::trace_span!("lattice_recenter").entered();
        let chunk = chunk_of(viewer, self.chunk_size);
        let origin = chunk.origin(self.chunk_size);

        for element in &mut self.elements {
            let position = origin + element.offset;
            scene.set_position(element.handle, position)?;
            element.position = position;
        }

        if self.origin != Some(chunk) {
            tracing::debug!(?chunk, from = ?self.origin, "lattice moved to new chunk");
            self.origin = Some(chunk);
        }
        Ok(chunk)
    }

    /// Slots a pool of render distance `r` holds.
    pub fn capacity_for(render_distance: i32) -> usize {
        LatticeConfig {
            render_distance,
            ..LatticeConfig::default()
        }
        .element_count()
    }

    /// Chunk applied by the last `recenter`, if any.
    pub fn origin(&self) -> Option<ChunkCoord> {
        self.origin
    }

    /// Handles of every element, in slot order. Used as ray candidates.
    pub fn handles(&self) -> &[ShapeHandle] {
        &self.handles
    }

    pub fn iter(&self) -> impl Iterator<Item = &LatticeElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::snapped_origin;
    use latticewalk_render::Scene;

    /// Counts calls instead of storing shapes.
    #[derive(Default)]
    struct CountingScene {
        created: usize,
        moves: usize,
    }

    impl SceneGraph for CountingScene {
        fn create_shape(&mut self, _g: BoxGeometry, _m: MaterialHandle) -> ShapeHandle {
            self.created += 1;
            ShapeHandle(self.created as u32 - 1)
        }

        fn set_position(&mut self, _h: ShapeHandle, _p: Vec3) -> Result<(), RenderError> {
            self.moves += 1;
            Ok(())
        }
    }

    fn small_config() -> LatticeConfig {
        LatticeConfig {
            chunk_size: 10.0,
            render_distance: 2,
            ..LatticeConfig::default()
        }
    }

    #[test]
    fn preload_creates_one_shape_per_key() {
        let config = LatticeConfig::default();
        let mut scene = CountingScene::default();
        let pool = LatticePool::preload(&config, &mut scene).unwrap();

        assert_eq!(pool.len(), 13 * 13 * 3 + 13 * 13 * 13);
        assert_eq!(pool.len(), LatticePool::capacity_for(6));
        assert_eq!(scene.created, pool.len());
        assert_eq!(pool.handles().len(), pool.len());
    }

    #[test]
    fn recenter_does_not_create_shapes() {
        let config = small_config();
        let mut scene = CountingScene::default();
        let mut pool = LatticePool::preload(&config, &mut scene).unwrap();
        let created = scene.created;
        let moves = scene.moves;

        pool.recenter(Vec3::new(123.0, -45.0, 6.0), &mut scene).unwrap();
        assert_eq!(scene.created, created);
        assert_eq!(scene.moves - moves, pool.len());
    }

    #[test]
    fn every_key_maps_to_its_own_slot() {
        let config = small_config();
        let mut scene = Scene::new();
        let pool = LatticePool::preload(&config, &mut scene).unwrap();

        for (slot, element) in pool.iter().enumerate() {
            assert_eq!(pool.slot(element.key), Some(slot));
            assert_eq!(pool.get(element.key).unwrap().handle, element.handle);
        }
    }

    #[test]
    fn out_of_range_keys_have_no_slot() {
        let config = small_config();
        let mut scene = Scene::new();
        let pool = LatticePool::preload(&config, &mut scene).unwrap();

        assert!(!pool.contains(LatticeKey::bar(3, 0, Axis::X)));
        assert!(!pool.contains(LatticeKey::platform(0, 0, -3)));
        // Bars carry k = -1 only.
        assert!(!pool.contains(LatticeKey::new(0, 0, Axis::Y, 0)));
        assert!(pool.contains(LatticeKey::bar(-2, 2, Axis::Z)));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "never registered"))]
    fn unknown_key_is_lookup_error() {
        let config = small_config();
        let mut scene = Scene::new();
        let pool = LatticePool::preload(&config, &mut scene).unwrap();

        let key = LatticeKey::platform(9, 9, 9);
        assert!(matches!(pool.get(key), Err(PoolError::KeyNotFound(k)) if k == key));
    }

    #[test]
    fn offsets_follow_axis_layout() {
        let c = 10.0;
        assert_eq!(lattice_offset(LatticeKey::bar(1, 2, Axis::X), c), Vec3::new(0.0, 10.0, 20.0));
        assert_eq!(lattice_offset(LatticeKey::bar(1, 2, Axis::Y), c), Vec3::new(10.0, 0.0, 20.0));
        assert_eq!(lattice_offset(LatticeKey::bar(1, 2, Axis::Z), c), Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(
            lattice_offset(LatticeKey::platform(1, 2, -3), c),
            Vec3::new(10.0, 20.0, -30.0)
        );
    }

    #[test]
    fn geometry_spans_render_distance() {
        let config = small_config();
        let x = lattice_geometry(Axis::X, &config);
        assert_eq!(x.size, Vec3::new(40.0, 3.0, 3.0));
        let y = lattice_geometry(Axis::Y, &config);
        assert_eq!(y.size, Vec3::new(3.0, 40.0, 3.0));
        let p = lattice_geometry(Axis::Platform, &config);
        assert_eq!(p.size, Vec3::new(7.5, 3.0, 7.5));
    }

    #[test]
    fn recenter_places_elements_at_origin_plus_offset() {
        let config = small_config();
        let mut scene = Scene::new();
        let mut pool = LatticePool::preload(&config, &mut scene).unwrap();

        for viewer in [
            Vec3::new(1.25, 1.5, -1.25),
            Vec3::new(19.99, -0.01, 35.0),
            Vec3::new(-123.4, 56.7, -0.5),
        ] {
            let chunk = pool.recenter(viewer, &mut scene).unwrap();
            let origin = snapped_origin(viewer, config.chunk_size);
            assert_eq!(pool.origin(), Some(chunk));
            for element in pool.iter() {
                assert_eq!(element.position, origin + element.offset);
                assert_eq!(scene.position(element.handle), Some(element.position));
            }
        }
    }

    #[test]
    fn recenter_ignores_fraction_within_chunk() {
        let config = small_config();
        let mut scene = Scene::new();
        let mut pool = LatticePool::preload(&config, &mut scene).unwrap();

        pool.recenter(Vec3::new(10.1, 20.2, -9.9), &mut scene).unwrap();
        let first: Vec<Vec3> = pool.iter().map(|e| e.position).collect();
        pool.recenter(Vec3::new(19.9, 29.8, -0.1), &mut scene).unwrap();
        let second: Vec<Vec3> = pool.iter().map(|e| e.position).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn recenter_is_idempotent() {
        let config = small_config();
        let mut scene = Scene::new();
        let mut pool = LatticePool::preload(&config, &mut scene).unwrap();
        let viewer = Vec3::new(-57.3, 12.0, 99.9);

        pool.recenter(viewer, &mut scene).unwrap();
        let once: Vec<Vec3> = scene.nodes().iter().map(|n| n.position).collect();
        pool.recenter(viewer, &mut scene).unwrap();
        let twice: Vec<Vec3> = scene.nodes().iter().map(|n| n.position).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn lattice_stays_within_render_cube() {
        let config = small_config();
        let mut scene = Scene::new();
        let mut pool = LatticePool::preload(&config, &mut scene).unwrap();
        let viewer = Vec3::new(-31.0, 47.0, 3.0);
        pool.recenter(viewer, &mut scene).unwrap();

        let origin = snapped_origin(viewer, config.chunk_size);
        let limit = (config.render_distance + 1) as f32 * config.chunk_size;
        for element in pool.iter() {
            let d = (element.position - origin).abs();
            assert!(d.max_element() <= limit, "{} too far", element.key);
        }
    }
}
