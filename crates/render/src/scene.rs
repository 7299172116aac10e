use glam::Vec3;

/// Index of a shape registered with a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u32);

/// A handle referencing a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

impl MaterialHandle {
    /// Default material shared by every lattice element.
    pub const LATTICE: MaterialHandle = MaterialHandle(0);
}

/// Axis-aligned box centered on its node position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub size: Vec3,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            size: Vec3::new(width, height, depth),
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shape {0:?} was never registered with the scene")]
    UnknownShape(ShapeHandle),
}

/// Write side of a scene graph: register shapes once, then move them.
pub trait SceneGraph {
    /// Register a new shape at the origin and return its handle.
    fn create_shape(&mut self, geometry: BoxGeometry, material: MaterialHandle) -> ShapeHandle;

    /// Move a previously registered shape.
    fn set_position(&mut self, handle: ShapeHandle, position: Vec3) -> Result<(), RenderError>;
}

/// One drawable node.
#[derive(Debug, Clone, Copy)]
pub struct SceneNode {
    pub geometry: BoxGeometry,
    pub material: MaterialHandle,
    pub position: Vec3,
}

impl SceneNode {
    pub fn min(&self) -> Vec3 {
        self.position - self.geometry.half_extents()
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.geometry.half_extents()
    }
}

/// In-memory scene graph shared by every renderer backend.
///
/// Nodes are never removed, so a handle stays valid for the scene's lifetime.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, handle: ShapeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle.0 as usize)
    }

    pub fn position(&self, handle: ShapeHandle) -> Option<Vec3> {
        self.node(handle).map(|n| n.position)
    }

    /// All nodes in registration order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Axis-aligned bounds of every node, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.nodes.first()?;
        let init = (first.min(), first.max());
        Some(
            self.nodes
                .iter()
                .fold(init, |(lo, hi), n| (lo.min(n.min()), hi.max(n.max()))),
        )
    }
}

impl SceneGraph for Scene {
    fn create_shape(&mut self, geometry: BoxGeometry, material: MaterialHandle) -> ShapeHandle {
        let handle = ShapeHandle(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            geometry,
            material,
            position: Vec3::ZERO,
        });
        handle
    }

    fn set_position(&mut self, handle: ShapeHandle, position: Vec3) -> Result<(), RenderError> {
        let node = self
            .nodes
            .get_mut(handle.0 as usize)
            .ok_or(RenderError::UnknownShape(handle))?;
        node.position = position;
        Ok(())
    }
}
