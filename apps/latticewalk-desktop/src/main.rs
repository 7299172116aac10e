use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use latticewalk_common::Settings;
use latticewalk_input::{InputState, Key};
use latticewalk_kernel::{FrameReport, KernelError, World};
use latticewalk_render::{RenderView, Scene};
use latticewalk_render_wgpu::WgpuRenderer;
use latticewalk_tools::{DebugReadout, LatticeInspector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "latticewalk-desktop", about = "Walk an endless lattice")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON settings file (lattice and physics)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Clamp each frame's delta to this many seconds
    #[arg(long)]
    max_delta: Option<f32>,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if cli.max_delta.is_some() {
        settings.physics.max_frame_delta = cli.max_delta;
    }
    settings.validate()?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Movement keys the lattice cares about. Everything else is ignored.
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::char('w')),
        KeyCode::KeyA => Some(Key::char('a')),
        KeyCode::KeyS => Some(Key::char('s')),
        KeyCode::KeyD => Some(Key::char('d')),
        _ => None,
    }
}

/// Simulation side of the app: everything except the GPU.
struct AppState {
    world: World,
    scene: Scene,
    input: InputState,
    base_view: RenderView,
    last_report: Option<FrameReport>,
    last_frame: Instant,
    show_debug: bool,
}

impl AppState {
    fn new(settings: &Settings) -> Result<Self, KernelError> {
        let mut scene = Scene::with_capacity(settings.lattice.element_count());
        let world = World::new(settings, &mut scene)?;
        Ok(Self {
            base_view: RenderView::for_lattice(world.lattice()),
            world,
            scene,
            input: InputState::new(),
            last_report: None,
            last_frame: Instant::now(),
            show_debug: true,
        })
    }

    fn update(&mut self) -> Result<FrameReport, KernelError> {
        let now = Instant::now();
        let delta = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let intent = self.input.move_intent();
        let report = self.world.step(&mut self.scene, intent, delta)?;
        self.last_report = Some(report);
        Ok(report)
    }

    fn view(&self) -> RenderView {
        self.world.view(self.base_view)
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_debug {
            return;
        }
        let readout = self
            .last_report
            .as_ref()
            .map(DebugReadout::from_report)
            .unwrap_or_else(|| {
                let v = self.world.viewer();
                DebugReadout::new(v.position, v.vertical_velocity, 0.0)
            });
        let summary = LatticeInspector::summary(&self.world);

        egui::Window::new("Debug")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Position: {}", readout.position_text()));
                ui.label(format!("Velocity: {}", readout.velocity_text()));
                ui.label(format!("Delta: {}", readout.delta_text()));
                ui.separator();
                ui.small(summary.to_string());
                ui.small(if self.input.is_captured() {
                    "WASD: Move | Esc: Release"
                } else {
                    "Click to capture | F1: Toggle panel"
                });
            });
    }
}

/// Window and GPU resources, created on `resumed`.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, capacity: usize) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Latticewalk")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("latticewalk_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height, capacity);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Pointer lock where supported, confinement otherwise.
    fn grab_cursor(&self) -> bool {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                true
            }
            Err(e) => {
                tracing::warn!("cursor grab unavailable: {e}");
                false
            }
        }
    }

    fn release_cursor(&self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("cursor release failed: {e}");
        }
        self.window.set_cursor_visible(true);
    }

    fn draw(&mut self, egui_ctx: &EguiContext, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &target,
            &state.scene,
            &state.view(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn set_captured(&mut self, captured: bool) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        if captured {
            if gpu.grab_cursor() {
                self.state.input.set_captured(true);
            }
        } else {
            gpu.release_cursor();
            self.state.input.set_captured(false);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, self.state.scene.len()) {
            Ok(gpu) => {
                // The first delta starts once the window is up.
                self.state.last_frame = Instant::now();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            // While captured the pointer belongs to the view, not the panel.
            if !self.state.input.is_captured() {
                let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(false) => {
                self.set_captured(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                match (code, pressed) {
                    (KeyCode::Escape, true) => self.set_captured(false),
                    (KeyCode::F1, true) => self.state.show_debug = !self.state.show_debug,
                    _ => {
                        if let Some(key) = map_key(code) {
                            if pressed {
                                self.state.input.press(key);
                            } else {
                                self.state.input.release(key);
                            }
                        }
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.input.is_captured() {
                    self.set_captured(true);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.state.update() {
                    tracing::error!("simulation halted: {e}");
                    event_loop.exit();
                    return;
                }
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&self.egui_ctx, &mut self.state);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.input.is_captured() {
                self.state.world.look(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("latticewalk-desktop starting");

    let settings = load_settings(&cli)?;
    let state = AppState::new(&settings)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
