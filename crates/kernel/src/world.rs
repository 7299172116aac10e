use glam::Vec3;
use latticewalk_common::{ConfigError, LatticeConfig, Settings};
use latticewalk_input::MoveIntent;
use latticewalk_render::{Intersector, RenderView, SceneGraph};
use latticewalk_stream::{ChunkCoord, GroundProbe, LatticePool, PoolError};

use crate::motion::MotionIntegrator;
use crate::viewer::Viewer;

/// Errors that stop the frame loop.
///
/// Positions are maintained relative to the last frame, so none of these are
/// recoverable: a host must halt rather than draw a corrupted lattice.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
    #[error("lattice pool: {0}")]
    Pool(#[from] PoolError),
    #[error("frame delta {0} is not a finite non-negative number")]
    InvalidDelta(f32),
}

/// What happened during one `World::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Delta actually integrated (after optional clamping).
    pub delta: f32,
    pub position: Vec3,
    pub velocity: f32,
    pub grounded: bool,
    /// Chunk the lattice is centered on after this frame.
    pub chunk: ChunkCoord,
    pub eye_height: f32,
}

/// The authoritative simulation state: viewer, lattice pool, clock.
///
/// Scene shapes are owned by the host's scene graph; the world only holds
/// their handles through the pool and moves them every step.
#[derive(Debug)]
pub struct World {
    lattice: LatticeConfig,
    integrator: MotionIntegrator,
    probe: GroundProbe,
    viewer: Viewer,
    pool: LatticePool,
    elapsed: f32,
    frame: u64,
    grounded: Option<bool>,
    eye_height: f32,
}

impl World {
    /// Preload the lattice into `scene` and center it on a fresh viewer.
    pub fn new<S: SceneGraph + ?Sized>(settings: &Settings, scene: &mut S) -> Result<Self, KernelError> {
        Self::with_viewer(settings, Viewer::default(), scene)
    }

    pub fn with_viewer<S: SceneGraph + ?Sized>(
        settings: &Settings,
        viewer: Viewer,
        scene: &mut S,
    ) -> Result<Self, KernelError> {
        settings.validate()?;
        let mut pool = LatticePool::preload(&settings.lattice, scene)?;
        pool.recenter(viewer.position, scene)?;
        Ok(Self {
            lattice: settings.lattice,
            integrator: MotionIntegrator::new(settings.physics),
            probe: GroundProbe::from_physics(&settings.physics),
            viewer,
            pool,
            elapsed: 0.0,
            frame: 0,
            grounded: None,
            eye_height: settings.physics.eye_height,
        })
    }

    /// Advance one frame.
    ///
    /// Order: walk, recenter, probe, fall, recenter. Probing after the first
    /// recenter means grounding sees this frame's horizontal move.
    pub fn step<S>(&mut self, scene: &mut S, intent: MoveIntent, delta: f32) -> Result<FrameReport, KernelError>
    where
        S: SceneGraph + Intersector + ?Sized,
    {
        if !delta.is_finite() || delta < 0.0 {
            return Err(KernelError::InvalidDelta(delta));
        }
        let delta = self.integrator.effective_delta(delta);
        self.frame += 1;
        self.elapsed += delta;

        self.viewer.position += self.integrator.horizontal(intent, self.viewer.yaw, delta);
        self.pool.recenter(self.viewer.position, scene)?;

        let grounded = self.probe.is_grounded(self.viewer.position, &self.pool, &*scene);
        if self.grounded != Some(grounded) {
            tracing::debug!(grounded, position = ?self.viewer.position, "ground contact changed");
            self.grounded = Some(grounded);
        }

        let velocity = self.viewer.vertical_velocity;
        self.viewer.vertical_velocity = self.integrator.vertical_velocity(velocity, grounded, delta);
        self.viewer.position.y += self.viewer.vertical_velocity * delta;

        let chunk = self.pool.recenter(self.viewer.position, scene)?;
        self.eye_height = self.integrator.eye_height(self.elapsed, intent);

        let report = FrameReport {
            frame: self.frame,
            delta,
            position: self.viewer.position,
            velocity: self.viewer.vertical_velocity,
            grounded,
            chunk,
            eye_height: self.eye_height,
        };
        tracing::trace!(?report, "frame stepped");
        Ok(report)
    }

    /// Camera for the current state, keeping `base`'s projection and fog.
    pub fn view(&self, base: RenderView) -> RenderView {
        RenderView {
            eye: self.viewer.position + Vec3::Y * self.eye_height,
            yaw: self.viewer.yaw,
            pitch: self.viewer.pitch,
            ..base
        }
    }

    /// Apply pointer motion with the configured sensitivity.
    pub fn look(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.integrator.physics.look_sensitivity;
        self.viewer.look(dx, dy, sensitivity);
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    pub fn pool(&self) -> &LatticePool {
        &self.pool
    }

    pub fn lattice(&self) -> &LatticeConfig {
        &self.lattice
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated integrated time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
