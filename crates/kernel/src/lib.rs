//! World Kernel: viewer state, motion integration and the frame pipeline.
//!
//! # Invariants
//! - Grounded frames always end with zero vertical velocity.
//! - Vertical velocity never drops below the terminal velocity.
//! - Every step ends with the lattice centered on the viewer's chunk.

mod motion;
mod viewer;
mod world;

pub use motion::MotionIntegrator;
pub use viewer::{SPAWN_POSITION, Viewer};
pub use world::{FrameReport, KernelError, World};

pub fn crate_info() -> &'static str {
    "latticewalk-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
