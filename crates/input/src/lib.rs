//! Input: held keys and pointer capture, reduced to a per-frame movement intent.
//!
//! # Invariants
//! - No key state survives a capture release.
//! - The frame reads one `MoveIntent` snapshot; events never reach the kernel.

pub mod action;
pub mod state;

pub use action::MoveIntent;
pub use state::{InputState, Key};

pub fn crate_info() -> &'static str {
    "latticewalk-input v0.1.0"
}
