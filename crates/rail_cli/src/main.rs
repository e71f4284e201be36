//! Rail CLI
//!
//! Command-line driver for the workspace rail: simulate selection scripts on
//! a virtual clock and inspect the effective configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rail_core::{Axis, ItemId};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use simulate::{OutputFormat, Scenario};

#[derive(Parser)]
#[command(name = "rail")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Workspace rail indicator CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a selection script and print every emitted style
    Simulate {
        /// Config file (defaults to ./rail.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Axis the items are laid out along (horizontal, vertical)
        #[arg(short, long)]
        axis: Option<Axis>,

        /// Number of items in the row
        #[arg(long, default_value = "5")]
        items: u32,

        /// Size of each item in pixels
        #[arg(long, default_value = "40")]
        extent: f64,

        /// Gap between items in pixels
        #[arg(long, default_value = "20")]
        spacing: f64,

        /// Milliseconds between consecutive selections
        #[arg(long, default_value = "500")]
        interval_ms: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "css")]
        format: OutputFormat,

        /// Layout polls each item answers "not laid out" before appearing
        #[arg(long, default_value = "0")]
        unready_polls: u32,

        /// Items to select, in order
        #[arg(required = true)]
        selections: Vec<u32>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file (defaults to ./rail.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the simulation output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            axis,
            items,
            extent,
            spacing,
            interval_ms,
            format,
            unready_polls,
            selections,
        } => {
            let scenario = Scenario {
                items,
                extent,
                spacing,
                interval: Duration::from_millis(interval_ms),
                unready_polls,
                selections: selections.into_iter().map(ItemId::new).collect(),
            };
            cmd_simulate(config.as_deref(), axis, &scenario, format)
        }

        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn cmd_simulate(
    config_path: Option<&std::path::Path>,
    axis: Option<Axis>,
    scenario: &Scenario,
    format: OutputFormat,
) -> Result<()> {
    if !(scenario.extent.is_finite() && scenario.extent > 0.0) {
        anyhow::bail!("--extent must be positive, got {}", scenario.extent);
    }
    if !(scenario.spacing.is_finite() && scenario.spacing >= 0.0) {
        anyhow::bail!("--spacing must not be negative, got {}", scenario.spacing);
    }

    let config = config::resolve(config_path, axis)?;
    info!(
        "Simulating {} selection(s) over {} {} item(s)",
        scenario.selections.len(),
        scenario.items,
        config.axis.as_str()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = simulate::run(config, scenario, format, &mut out)?;
    out.flush()?;

    match summary.rail {
        Some(rail) => info!(
            "Rail settled at {}px (size {}px) after {}ms, {} style(s) emitted",
            rail.position,
            rail.size,
            summary.elapsed.as_millis(),
            summary.emitted
        ),
        None => info!("Rail was never placed"),
    }

    Ok(())
}

fn cmd_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::resolve(config_path, None)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
