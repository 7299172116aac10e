//! Shared types and configuration for the latticewalk engine.
//!
//! # Invariants
//! - Lattice and physics settings are fixed once a world is built.
//! - Every pool slot is named by exactly one `LatticeKey`.

mod config;
mod types;

pub use config::{ConfigError, LatticeConfig, PhysicsConfig, Settings};
pub use types::{Axis, BAR_K, LatticeKey};

pub fn crate_info() -> &'static str {
    "latticewalk-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
