use anyhow::Context as _;
use clap::{Parser, Subcommand};
use glam::Vec3;
use latticewalk_common::Settings;
use latticewalk_input::{InputState, Key};
use latticewalk_kernel::{SPAWN_POSITION, Viewer, World};
use latticewalk_render::{DebugTextRenderer, RenderView, Renderer, Scene};
use latticewalk_stream::GroundProbe;
use latticewalk_tools::{DebugReadout, LatticeInspector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "latticewalk-cli", about = "Headless latticewalk tools")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON settings file (lattice and physics)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Clamp each frame's delta to this many seconds
    #[arg(long, global = true)]
    max_delta: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version, crate info and lattice size
    Info,
    /// Print the effective settings as JSON
    Settings,
    /// Step the world with held keys and a fixed delta
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(short, long, default_value = "0.016")]
        delta: f32,
        /// Movement keys held for the whole run, e.g. "wd"
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Viewer yaw in radians
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        yaw: f32,
        /// Start position as x,y,z (defaults to spawn)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        from: Option<Vec3>,
        /// Print a readout every N frames (0 = only the last)
        #[arg(long, default_value = "0")]
        every: u64,
        /// Dump the scene with the debug text renderer at the end
        #[arg(long)]
        dump_scene: bool,
    },
    /// List what the ground probe hits for feet at a position
    Probe {
        /// Feet position as x,y,z
        #[arg(value_parser = parse_vec3, allow_hyphen_values = true)]
        at: Vec3,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got {s:?}"));
    };
    let num = |v: &str| v.parse::<f32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Vec3::new(num(x)?, num(y)?, num(z)?))
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
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

/// Captured input with `keys` held.
fn held_keys(keys: &str) -> InputState {
    let mut input = InputState::new();
    input.set_captured(true);
    for c in keys.chars().filter(|c| c.is_ascii_alphabetic()) {
        input.press(Key::char(c));
    }
    input
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("latticewalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", latticewalk_common::crate_info());
            println!("kernel: {}", latticewalk_kernel::crate_info());
            println!("render: {}", latticewalk_render::crate_info());
            println!("stream: {}", latticewalk_stream::crate_info());
            println!("input: {}", latticewalk_input::crate_info());
            println!("tools: {}", latticewalk_tools::crate_info());
            let lattice = &settings.lattice;
            println!(
                "lattice: chunk_size={} render_distance={} elements={}",
                lattice.chunk_size,
                lattice.render_distance,
                lattice.element_count()
            );
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::Simulate {
            frames,
            delta,
            keys,
            yaw,
            from,
            every,
            dump_scene,
        } => {
            let mut viewer = Viewer::at(from.unwrap_or(SPAWN_POSITION));
            viewer.yaw = yaw;

            let mut scene = Scene::with_capacity(settings.lattice.element_count());
            let mut world = World::with_viewer(&settings, viewer, &mut scene)?;
            let input = held_keys(&keys);
            let intent = input.move_intent();
            println!("Simulating {frames} frames at delta={delta} intent={intent:?}");

            let mut last = None;
            for _ in 0..frames {
                let report = world.step(&mut scene, input.move_intent(), delta)?;
                if every > 0 && report.frame % every == 0 {
                    println!(
                        "[{:>5}] {} grounded={}",
                        report.frame,
                        DebugReadout::from_report(&report),
                        report.grounded
                    );
                }
                last = Some(report);
            }

            if let Some(report) = last {
                println!("Final: {}", DebugReadout::from_report(&report));
                println!("Grounded: {}", report.grounded);
            }
            println!("{}", LatticeInspector::summary(&world));

            if dump_scene {
                let mut renderer = DebugTextRenderer::new();
                let view = world.view(RenderView::for_lattice(world.lattice()));
                print!("{}", renderer.render_frame(&scene, &view));
            }
        }
        Commands::Probe { at } => {
            let mut scene = Scene::with_capacity(settings.lattice.element_count());
            let world = World::with_viewer(&settings, Viewer::at(at), &mut scene)?;
            let probe = GroundProbe::from_physics(&settings.physics);
            let hits = LatticeInspector::probe_hits(&probe, at, world.pool(), &scene);

            println!(
                "Probe at {}: {}",
                DebugReadout::new(at, 0.0, 0.0).position_text(),
                if hits.is_empty() { "airborne" } else { "grounded" }
            );
            for h in &hits {
                println!("  {} at distance {:.3}", h.key, h.hit.distance);
            }
        }
    }

    Ok(())
}
