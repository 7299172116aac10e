use crate::scene::Scene;
use glam::Vec3;
use latticewalk_common::LatticeConfig;
use std::fmt::Write as _;

/// First-person camera and atmosphere for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Rotation about +Y in radians. Zero looks down -Z.
    pub yaw: f32,
    /// Rotation about the camera's X axis in radians.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance at which fog fully hides geometry.
    pub fog_far: f32,
    /// Clear color, also used as the fog color. Linear, since the surface
    /// is sRGB and encodes on write.
    pub background: [f32; 3],
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            fog_far: 64.0 * 6.0 * 0.9,
            background: [srgb_to_linear(0xaa as f32 / 255.0); 3],
        }
    }
}

impl RenderView {
    /// Default view with fog reaching just short of the lattice edge.
    pub fn for_lattice(lattice: &LatticeConfig) -> Self {
        Self {
            fog_far: lattice.chunk_size * lattice.render_distance as f32 * 0.9,
            ..Self::default()
        }
    }

    /// Unit vector the camera looks along (yaw, then pitch).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }
}

/// Decode one sRGB-encoded channel in `0..=1` to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer only reads the scene; element positions are owned by the
/// lattice pool and written through `SceneGraph`.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `view`.
    fn render_frame(&mut self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable summary of the scene.
///
/// Used by the CLI and by tests in place of a GPU backend.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Print at most this many node positions.
    pub max_listed: usize,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            max_listed: 8,
            frames: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render_frame(&mut self, scene: &Scene, view: &RenderView) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ===", self.frames);
        let _ = writeln!(out, "Elements: {}", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) yaw={:.2} pitch={:.2} fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.yaw, view.pitch, view.fov_degrees
        );
        if let Some((lo, hi)) = scene.bounds() {
            let _ = writeln!(
                out,
                "Bounds: min=({:.1}, {:.1}, {:.1}) max=({:.1}, {:.1}, {:.1})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            );
        }
        for (index, node) in scene.nodes().iter().take(self.max_listed).enumerate() {
            let p = node.position;
            let s = node.geometry.size;
            let _ = writeln!(
                out,
                "  [{index:>5}] pos=({:.2}, {:.2}, {:.2}) size=({:.1}, {:.1}, {:.1})",
                p.x, p.y, p.z, s.x, s.y, s.z
            );
        }
        if scene.len() > self.max_listed {
            let _ = writeln!(out, "  ... {} more", scene.len() - self.max_listed);
        }
        tracing::trace!(frame = self.frames, nodes = scene.len(), "debug frame rendered");
        out
    }
}
