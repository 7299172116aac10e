//! wgpu render backend for latticewalk.
//!
//! Draws every node of a `Scene` as an instanced box, lit by one directional
//! light plus ambient, fading linearly into the background color.
//!
//! # Invariants
//! - The renderer reads the scene; it never moves shapes.
//! - The camera comes from a `RenderView`, never from input directly.

mod camera;
mod gpu;
mod shaders;

pub use camera::ViewCamera;
pub use gpu::{Lighting, WgpuRenderer};
