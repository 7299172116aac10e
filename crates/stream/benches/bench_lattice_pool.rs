use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use latticewalk_common::LatticeConfig;
use latticewalk_render::Scene;
use latticewalk_stream::{GroundProbe, LatticePool};

fn config(render_distance: i32) -> LatticeConfig {
    LatticeConfig {
        render_distance,
        ..LatticeConfig::default()
    }
}

fn bench_preload(render_distance: i32, iterations: usize) {
    let config = config(render_distance);

    let start = Instant::now();
    for _ in 0..iterations {
        let mut scene = Scene::with_capacity(config.element_count());
        let pool = LatticePool::preload(black_box(&config), &mut scene).unwrap();
        black_box(pool.len());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  preload (R={render_distance}, {} elements, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        config.element_count()
    );
}

fn bench_recenter(render_distance: i32, iterations: usize) {
    let config = config(render_distance);
    let mut scene = Scene::new();
    let mut pool = LatticePool::preload(&config, &mut scene).unwrap();

    let start = Instant::now();
    for i in 0..iterations {
        // Simulate a viewer walking across chunk boundaries
        let viewer = Vec3::new(i as f32 * 3.7, -(i as f32) * 0.9, i as f32 * -1.3);
        black_box(pool.recenter(black_box(viewer), &mut scene).unwrap());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  recenter (R={render_distance}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_probe(render_distance: i32, iterations: usize) {
    let config = config(render_distance);
    let mut scene = Scene::new();
    let pool = LatticePool::preload(&config, &mut scene).unwrap();
    let probe = GroundProbe::default();

    let grounded = Vec3::new(1.25, 1.5, -1.25);
    let airborne = Vec3::new(20.0, 20.0, 20.0);
    let start = Instant::now();
    for i in 0..iterations {
        let feet = if i % 2 == 0 { grounded } else { airborne };
        black_box(probe.is_grounded(black_box(feet), &pool, &scene));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  ground probe (R={render_distance}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Lattice Pool Benchmarks ===\n");

    println!("Preload:");
    bench_preload(2, 1000);
    bench_preload(6, 100);
    bench_preload(10, 10);

    println!("\nRecenter (full pool every frame):");
    bench_recenter(2, 10000);
    bench_recenter(6, 1000);
    bench_recenter(10, 100);

    println!("\nGround probe:");
    bench_probe(2, 10000);
    bench_probe(6, 1000);

    println!("\n=== Done ===");
}
