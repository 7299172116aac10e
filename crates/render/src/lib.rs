//! Rendering Adapter: scene graph, ray queries and renderer-agnostic interface.
//!
//! # Invariants
//! - Shapes are registered once and only moved afterwards; handles never dangle.
//! - Renderers read the scene, they never move shapes.
//!
//! The debug text renderer stands in for the GPU backend in headless hosts and
//! tests. Backends consume the same `Scene`.

mod raycast;
mod renderer;
mod scene;

pub use raycast::{Intersector, Ray, RayHit, ray_box_entry};
pub use renderer::{DebugTextRenderer, RenderView, Renderer, srgb_to_linear};
pub use scene::{
    BoxGeometry, MaterialHandle, RenderError, Scene, SceneGraph, SceneNode, ShapeHandle,
};

pub fn crate_info() -> &'static str {
    "latticewalk-render v0.1.0"
}
