//! Developer Tooling: debug readout and lattice inspector.
//!
//! # Invariants
//! - Tools only read world state; they never move the viewer or the pool.

mod inspector;
mod readout;

pub use inspector::{ElementInfo, LatticeInspector, ProbeHit, WorldSummary};
pub use readout::{DebugReadout, round2};

pub fn crate_info() -> &'static str {
    "latticewalk-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
