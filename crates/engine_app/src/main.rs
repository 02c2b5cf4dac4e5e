//! # engine_app
//!
//! Loads an entity document, runs the movement system for a number of fixed
//! ticks, optionally prints the inspector view, and writes the entity back.
//!
//! ## Usage
//!
//! ```text
//! engine_app level.json --ticks 60 --dt 0.016 --inspect --output level.msgpack
//! ```
//!
//! The output format follows the file extension (`.msgpack`/`.mpk` for
//! MessagePack, anything else JSON).

mod config;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use runner::Runner;

#[derive(Parser)]
#[command(name = "engine_app", about = "Load, update, inspect, and save entity documents")]
struct Args {
    /// Entity document to load (.json, .msgpack or .mpk)
    input: PathBuf,

    /// Where to write the entity after updating
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of fixed update ticks
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Fail if any component type is unknown
    #[arg(long)]
    strict: bool,

    /// Print the inspector view of the entity
    #[arg(short, long)]
    inspect: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let mut config = AppConfig::new(args.input)
            .with_ticks(args.ticks, args.dt)
            .strict(args.strict)
            .inspect(args.inspect);
        if let Some(output) = args.output {
            config = config.with_output(output);
        }
        config
    }
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let config = AppConfig::from(Args::parse());
    info!(input = %config.input.display(), "engine_app starting");

    let summary = Runner::new(config)?.run()?;
    if let Some(text) = &summary.inspector {
        print!("{text}");
    }

    info!(
        entity = %summary.entity.id(),
        components = summary.entity.len(),
        skipped = summary.report.skipped_count(),
        "done"
    );
    Ok(())
}
