//! Streaming: a fixed pool of lattice elements that follows the viewer.
//!
//! # Invariants
//! - Shapes are created once at preload; recentering only moves them.
//! - After a recenter every element sits at `snapped_origin + offset`, so the
//!   lattice spans the `(2R+1)` chunk cube around the viewer's chunk.
//! - Recentering is full and allocation-free every frame.

mod grid;
mod pool;
mod probe;

pub use grid::{ChunkCoord, chunk_of, snapped_origin};
pub use pool::{LatticeElement, LatticePool, PoolError, lattice_geometry, lattice_offset};
pub use probe::GroundProbe;

pub fn crate_info() -> &'static str {
    "latticewalk-stream v0.1.0"
}
