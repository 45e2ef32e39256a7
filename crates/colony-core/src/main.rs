//! Colony Sandbox
//!
//! Runs AI-controlled microbe colonies in a seeded world and writes their
//! decisions to a JSONL event log.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colony_core::config::DEFAULT_CONFIG_PATH;
use colony_core::events::EventLogger;
use colony_core::{ColonyConfig, ConfigError, Sandbox};
use colony_events::EventType;

/// Command line arguments for the sandbox
#[derive(Parser, Debug)]
#[command(name = "colony_sim")]
#[command(about = "Runs microbe colony AI in a seeded sandbox")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Path to a TOML config file (defaults to colony.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write decision events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Interval between progress reports (in ticks)
    #[arg(long, default_value_t = 100)]
    report_interval: u64,
}

fn load_config(path: Option<&Path>) -> Result<ColonyConfig, ConfigError> {
    match path {
        Some(path) => ColonyConfig::from_file(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => ColonyConfig::from_file(DEFAULT_CONFIG_PATH),
        None => Ok(ColonyConfig::default()),
    }
}

fn open_logger(path: Option<&Path>) -> Result<EventLogger, colony_core::events::LogError> {
    let Some(path) = path else {
        return Ok(EventLogger::null());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    EventLogger::new(path)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.dt.is_finite() || args.dt <= 0.0 {
        tracing::error!("--dt must be positive, got {}", args.dt);
        return ExitCode::FAILURE;
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Could not load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logger = match open_logger(args.events.as_deref()) {
        Ok(logger) => logger,
        Err(e) => {
            tracing::error!("Could not open event log: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        seed = args.seed,
        ticks = args.ticks,
        dt = args.dt,
        threshold = config.ai.frustration_threshold,
        "Starting colony sandbox"
    );

    let mut sandbox = Sandbox::new(args.seed, &config, args.ticks, args.dt, logger);
    let summary = sandbox.summary();
    tracing::info!(
        colonies = summary.colonies,
        wild_microbes = summary.wild_microbes,
        chunks = summary.chunks,
        "Spawned population"
    );

    let report_interval = args.report_interval.max(1);
    let result = sandbox.run(|tick, events| {
        if tick > 0 && tick % report_interval == 0 {
            let decisions = events.iter().filter(|e| e.event_type.is_decision()).count();
            let kills = events
                .iter()
                .filter(|e| e.event_type == EventType::PreyKilled)
                .count();
            tracing::info!(
                "Tick {} / {} ({} decisions, {} kills)",
                tick,
                args.ticks,
                decisions,
                kills
            );
        }
    });

    let tally = match result {
        Ok(tally) => tally,
        Err(e) => {
            tracing::error!("Event log write failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let summary = sandbox.summary();
    tracing::info!("Simulation complete. Ran {} ticks.", args.ticks);
    println!("Population:");
    print!("{}", summary);
    println!("Events ({} total):", tally.total());
    print!("{}", tally);
    if let Some(path) = &args.events {
        println!("Event log: {}", path.display());
    }

    ExitCode::SUCCESS
}
