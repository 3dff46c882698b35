#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Forage simulation headlessly.

mod config;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forage_core::{Command, Event, RoundSummary};
use forage_system_analytics::Analytics;
use forage_world::{self as world, query, RngSource, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use crate::{config::Overrides, report::RunOutcome};

/// Runs foraging rounds without a display and summarises the population.
#[derive(Debug, Parser)]
#[command(name = "forage")]
#[command(about = "Run the Forage simulation headlessly and summarise the population")]
struct Args {
    /// TOML file with simulation parameters; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square arena
    #[arg(long)]
    floor_size: Option<f32>,

    /// Food items spawned at the start of every round
    #[arg(long)]
    food: Option<u32>,

    /// Size of the first generation
    #[arg(long)]
    creatures: Option<u32>,

    /// Multiplier converting speed traits into world units per second
    #[arg(long)]
    movement_scale: Option<f32>,

    /// Distance at which targeted food is eaten
    #[arg(long)]
    eat_radius: Option<f32>,

    /// Stop once this many rounds have ended
    #[arg(long, default_value_t = 10)]
    rounds: u32,

    /// Stop after this many ticks even if rounds are still running
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    dt_ms: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format of the final summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            floor_size: self.floor_size,
            food: self.food,
            creatures: self.creatures,
            movement_scale: self.movement_scale,
            eat_radius: self.eat_radius,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Bounds on how long a run may go on.
#[derive(Clone, Copy, Debug)]
struct Limits {
    rounds: u32,
    max_ticks: u64,
    dt: Duration,
}

/// Entry point for the Forage command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("forage=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref(), args.overrides())?;
    tracing::info!(?config, seed = ?args.seed, "starting simulation");

    let mut world = match args.seed {
        Some(seed) => World::with_random_source(
            config,
            Box::new(RngSource::new(ChaCha8Rng::seed_from_u64(seed))),
        ),
        None => World::new(config),
    }
    .context("failed to create world")?;

    let limits = Limits {
        rounds: args.rounds,
        max_ticks: args.max_ticks,
        dt: Duration::from_millis(args.dt_ms),
    };
    let outcome = run(&mut world, limits, args.seed);

    match args.format {
        OutputFormat::Text => print!("{}", outcome.render_text()),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&outcome).context("failed to serialise run summary")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Ticks `world` until a limit is reached or the population dies out.
fn run(world: &mut World, limits: Limits, seed: Option<u64>) -> RunOutcome {
    let mut analytics = Analytics::new();
    let mut events: Vec<Event> = Vec::new();
    let mut summaries: Vec<RoundSummary> = Vec::new();

    while analytics.ticks() < limits.max_ticks && query::round(world) < limits.rounds {
        events.clear();
        world::apply(world, Command::Tick { dt: limits.dt }, &mut events);

        summaries.clear();
        analytics.handle(&events, || query::population_report(world), &mut summaries);
        for summary in &summaries {
            let next = &summary.next_generation;
            tracing::debug!(
                round = summary.round,
                population = next.population,
                average_speed = next.average_speed,
                average_view_radius = next.average_view_radius,
                "next generation"
            );
        }

        if analytics.extinct_at().is_some() {
            break;
        }
    }

    if analytics.ticks() >= limits.max_ticks && query::round(world) < limits.rounds {
        tracing::warn!(
            ticks = analytics.ticks(),
            rounds = query::round(world),
            "tick limit reached before the requested rounds ended"
        );
    }

    RunOutcome {
        config: query::config(world).clone(),
        seed,
        ticks: analytics.ticks(),
        simulated_seconds: analytics.elapsed().as_secs_f64(),
        rounds: query::round(world),
        meals: analytics.meals(),
        peak_population: analytics.peak_population(),
        extinct_at: analytics.extinct_at(),
        population: query::population_report(world),
        history: analytics.history().to_vec(),
    }
}
