use glam::Vec3;

/// Integer coordinate of a chunk: `floor(position / chunk_size)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// World-space corner of this chunk (the snapped origin).
    pub fn origin(self, chunk_size: f32) -> Vec3 {
        Vec3::new(
            self.x as f32 * chunk_size,
            self.y as f32 * chunk_size,
            self.z as f32 * chunk_size,
        )
    }
}

/// Chunk containing `pos`. Rounds toward negative infinity, so
/// `-0.5` lands in chunk `-1`, not `0`.
pub fn chunk_of(pos: Vec3, chunk_size: f32) -> ChunkCoord {
    debug_assert!(chunk_size > 0.0, "chunk_size must be positive");
    ChunkCoord {
        x: (pos.x / chunk_size).floor() as i64,
        y: (pos.y / chunk_size).floor() as i64,
        z: (pos.z / chunk_size).floor() as i64,
    }
}

/// Chunk-floor of `pos` in world units.
pub fn snapped_origin(pos: Vec3, chunk_size: f32) -> Vec3 {
    chunk_of(pos, chunk_size).origin(chunk_size)
}
