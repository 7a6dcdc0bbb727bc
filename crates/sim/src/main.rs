//! Headless stat engine driver.
//!
//! Builds a character from a base table (or a save), runs the scripted
//! combat scenario and prints a summary.
//!
//! ```bash
//! SIM_TICKS=40 RUST_LOG=debug cargo run -p stats-sim -- --table hero.toml
//! ```

mod config;
mod scenario;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use stats_content::{ConfigLoader, SaveFile, TableLoader};
use stats_core::{BaseStatTable, ResourcePool, StatRegistry, StatsConfig};

use crate::config::SimConfig;
use crate::scenario::Scenario;

/// Run a scripted combat scenario against the stat engine
#[derive(Parser)]
#[command(name = "stats-sim")]
#[command(about = "Headless driver for the stat engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Base-value table (.toml or .ron). Defaults to the standard sheet.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Engine configuration (.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a saved character instead of a table
    #[arg(long, conflicts_with = "table")]
    load: Option<PathBuf>,

    /// Write the final character to this RON save file
    #[arg(long)]
    save_out: Option<PathBuf>,

    /// Print the final save as JSON to stdout
    #[arg(long)]
    dump_save: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sim_config = SimConfig::from_env();

    let stats_config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => StatsConfig::default(),
    };

    let mut pool = match (&cli.load, &cli.table) {
        (Some(path), _) => SaveFile::restore(path, stats_config)?,
        (None, Some(path)) => {
            let table = TableLoader::load(path)?;
            ResourcePool::with_config(StatRegistry::from_table(&table), stats_config)
        }
        (None, None) => ResourcePool::with_config(
            StatRegistry::from_table(&BaseStatTable::standard()),
            stats_config,
        ),
    };

    tracing::info!(
        ticks = sim_config.ticks,
        delta = sim_config.delta,
        seed_damage = sim_config.seed_damage,
        "starting scenario"
    );
    let report = Scenario::new(sim_config).run(&mut pool);

    println!("{report}");
    println!(
        "final:         hp {:.1}/{:.1}  mp {:.1}/{:.1}  sp {:.1}/{:.1}",
        pool.health(),
        pool.max_health(),
        pool.mana(),
        pool.max_mana(),
        pool.stamina(),
        pool.max_stamina()
    );

    let save = pool.to_save();
    if let Some(path) = &cli.save_out {
        SaveFile::write(path, &save)?;
    }
    if cli.dump_save {
        println!("{}", serde_json::to_string_pretty(&save)?);
    }

    Ok(())
}
