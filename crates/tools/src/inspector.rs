use glam::Vec3;
use latticewalk_common::LatticeKey;
use latticewalk_kernel::World;
use latticewalk_render::{Intersector, RayHit};
use latticewalk_stream::{ChunkCoord, GroundProbe, LatticePool};

/// Read-only queries against a running world for debug UIs and the CLI.
pub struct LatticeInspector;

impl LatticeInspector {
    pub fn summary(world: &World) -> WorldSummary {
        let pool = world.pool();
        let bars = pool.iter().filter(|e| e.key.axis.is_bar()).count();
        WorldSummary {
            frame: world.frame(),
            elapsed: world.elapsed(),
            chunk: pool.origin(),
            bars,
            platforms: pool.len() - bars,
            render_distance: pool.render_distance(),
            chunk_size: pool.chunk_size(),
        }
    }

    /// Position of one element, or `None` if the key lies outside the pool.
    pub fn inspect(pool: &LatticePool, key: LatticeKey) -> Option<ElementInfo> {
        if !pool.contains(key) {
            return None;
        }
        pool.get(key).ok().map(|e| ElementInfo {
            key: e.key,
            offset: e.offset,
            position: e.position,
        })
    }

    /// Everything a ground probe at `feet` would hit, nearest first.
    pub fn probe_hits<I: Intersector + ?Sized>(
        probe: &GroundProbe,
        feet: Vec3,
        pool: &LatticePool,
        intersector: &I,
    ) -> Vec<ProbeHit> {
        probe
            .hits(feet, pool, intersector)
            .into_iter()
            .filter_map(|hit| {
                let key = pool.iter().find(|e| e.handle == hit.handle)?.key;
                Some(ProbeHit { key, hit })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub frame: u64,
    pub elapsed: f32,
    pub chunk: Option<ChunkCoord>,
    pub bars: usize,
    pub platforms: usize,
    pub render_distance: i32,
    pub chunk_size: f32,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: frame={} elapsed={:.2}s bars={} platforms={} R={} C={}",
            self.frame, self.elapsed, self.bars, self.platforms, self.render_distance, self.chunk_size
        )?;
        match self.chunk {
            Some(c) => write!(f, " chunk=({}, {}, {})", c.x, c.y, c.z),
            None => write!(f, " chunk=none"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElementInfo {
    pub key: LatticeKey,
    pub offset: Vec3,
    pub position: Vec3,
}

impl std::fmt::Display for ElementInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Element [{}] pos=({:.2}, {:.2}, {:.2}) offset=({:.0}, {:.0}, {:.0})",
            self.key,
            self.position.x,
            self.position.y,
            self.position.z,
            self.offset.x,
            self.offset.y,
            self.offset.z,
        )
    }
}

/// A probe hit resolved back to its lattice key.
#[derive(Debug, Clone, Copy)]
pub struct ProbeHit {
    pub key: LatticeKey,
    pub hit: RayHit,
}
