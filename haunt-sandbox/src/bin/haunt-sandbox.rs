//! Scenario runner: loads a scenario, runs it headless and prints a report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use haunt_core::config::HauntConfig;
use haunt_sandbox::{Scenario, World};

/// Run a Haunt sandbox scenario
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Haunt configuration file
    #[arg(short, long, default_value = "haunt.toml")]
    config: PathBuf,

    /// Override the simulation seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario duration in seconds
    #[arg(long)]
    duration: Option<f32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Include every cue in the JSON report
    #[arg(long)]
    cues: bool,

    /// Print Prometheus counters after the run
    #[arg(long)]
    prometheus: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(config: &HauntConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.telemetry.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.telemetry.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = HauntConfig::from_file_or_default(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    init_logging(&config, args.verbose);

    let mut scenario = Scenario::from_file(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;
    if let Some(duration) = args.duration {
        anyhow::ensure!(duration > 0.0, "duration must be positive, got {duration}");
        scenario.duration = duration;
    }

    let mut world = World::from_scenario(&scenario, &config)
        .context("building world")?
        .with_cue_log(args.cues);
    world.run();
    let report = world.report();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).context("serializing report")?);
    } else {
        print!("{}", report.summary());
    }
    if args.prometheus {
        print!("{}", report.counters.to_prometheus());
    }
    Ok(())
}
