use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use landscape_search::{Config, Engine};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the model, run the search and print the results.
    Run,

    /// Build the model and print the team descriptives without searching.
    Check,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = Config::from_file(&args.config).context("failed to construct cfg")?;
    log::info!("{cfg:#?}");

    let mut engine = Engine::new(cfg).context("failed to construct engine")?;

    if let Command::Run = args.command {
        engine.step().context("failed to run engine")?;
    }

    let results = toml::to_string(&engine.results()).context("failed to serialize results")?;
    print!("{results}");

    Ok(())
}
