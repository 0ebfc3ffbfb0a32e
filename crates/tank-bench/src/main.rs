//! CLI driver for running the tank simulation headless: useful for
//! soak-testing determinism and eyeballing ecosystem metrics without a
//! renderer attached.

use anyhow::{Context, Result};
use clap::Parser;
use tank_core::{TankConfig, World};

#[derive(Parser, Debug)]
#[command(name = "tank-bench", about = "Run the fish-tank simulation headless")]
struct Cli {
    /// Number of frames to advance.
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// RNG seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Skip snapshot/delta assembly every frame, as the live UI does
    /// while fast-forwarding.
    #[arg(long, default_value_t = false)]
    fast_forward: bool,

    /// Print the final `StatsSnapshot` as JSON instead of a summary line.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = TankConfig::default();
    cfg.seed = cli.seed;
    let mut world = World::new(cfg).context("invalid tank configuration")?;
    if cli.fast_forward {
        world.apply_command(tank_core::Command::FastForward { enabled: true })?;
    }

    let mut last = world.step(None);
    for _ in 1..cli.steps {
        last = world.step(None);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&last.metrics)?);
    } else {
        let m = &last.metrics;
        println!(
            "frame {} | fish {} crabs {} plants {} food {} | births {} deaths {} | energy_delta {:.2} | violations {}",
            m.frame,
            m.population.fish,
            m.population.crabs,
            m.population.plants,
            m.population.food,
            m.total_births,
            m.total_deaths,
            m.energy_lifetime_delta,
            m.invariant_violations,
        );
    }

    Ok(())
}
