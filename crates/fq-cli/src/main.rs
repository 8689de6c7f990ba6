use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fq_cli::commands::{fields, floats, history, util};
use fq_cli::{Cli, Commands, Config};
use fq_core::sample;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    // Read the clock once; every window and label in this run uses it.
    let clock = Utc::now();
    let now = match &cli.now {
        Some(s) => util::parse_datetime(s, clock)?,
        None => clock,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Floats(args)) => {
            let config = load_config(&cli)?;
            let path = args
                .query
                .data
                .as_deref()
                .or(config.observations_path.as_deref());
            let store = util::load_store(path, sample::observations)?;
            floats::run(&mut out, &store, args, &config, now)?;
        }
        Some(Commands::History(args)) => {
            let config = load_config(&cli)?;
            let path = args
                .query
                .data
                .as_deref()
                .or(config.activities_path.as_deref());
            let store = util::load_store(path, || sample::activities(now))?;
            history::run(&mut out, &store, args, &config, now)?;
        }
        Some(Commands::Fields { dataset, json }) => {
            fields::run(&mut out, *dataset, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
