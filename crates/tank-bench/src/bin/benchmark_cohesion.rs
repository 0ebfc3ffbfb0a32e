//! Measures per-step overhead of full snapshot/delta assembly against a
//! population large enough to stress the spatial index and collision
//! resolution, by running the same seed twice: once under
//! fast-forward (metrics only) and once with full snapshots every step.

use std::time::Instant;

use tank_core::{TankConfig, World};

fn build_world(fish: usize, crabs: usize, seed: u64) -> World {
    let mut cfg = TankConfig::default();
    cfg.seed = seed;
    cfg.initial_fish_count = fish;
    cfg.initial_crab_count = crabs;
    cfg.max_population = fish.max(cfg.max_population);
    World::new(cfg).expect("default-derived config is valid")
}

fn main() {
    let fish = 50;
    let crabs = 4;
    let steps = 500;
    println!("Benchmarking with {fish} fish, {crabs} crabs, {steps} steps");

    let mut without_snapshot = build_world(fish, crabs, 42);
    without_snapshot
        .apply_command(tank_core::Command::FastForward { enabled: true })
        .expect("fast-forward is supported");
    let start = Instant::now();
    for _ in 0..steps {
        without_snapshot.step(None);
    }
    let duration_no_snapshot = start.elapsed();
    println!("Time for {steps} steps WITHOUT snapshots: {duration_no_snapshot:?}");
    println!("Avg time per step (no snapshots): {:?}", duration_no_snapshot / steps as u32);

    let mut with_snapshot = build_world(fish, crabs, 42);
    let start = Instant::now();
    for _ in 0..steps {
        with_snapshot.step(None);
    }
    let duration_snapshot = start.elapsed();
    println!("Time for {steps} steps WITH snapshots: {duration_snapshot:?}");
    println!("Avg time per step (with snapshots): {:?}", duration_snapshot / steps as u32);

    let diff = duration_snapshot.saturating_sub(duration_no_snapshot);
    println!("Total snapshot overhead: {diff:?}");
    println!("Avg snapshot overhead per step: {:?}", diff / steps as u32);
}
