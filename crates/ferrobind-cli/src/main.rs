//! Ferrobind — consensus Pareto selection for protein-binder design runs.
//! Entry point for the command-line binary.

mod commands;
mod config;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::hypervolume::HypervolumeArgs;
use commands::select::SelectArgs;

#[derive(Debug, Parser)]
#[command(name = "ferrobind", version, about = "Consensus Pareto selection for binder-design runs")]
struct Cli {
    /// Config file (toml, yaml or json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Select candidates that are non-dominated in every objective sweep
    Select(SelectArgs),
    /// Report the front hypervolume after each optimisation iteration
    Hypervolume(HypervolumeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ferrobind=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Ferrobind {}", env!("CARGO_PKG_VERSION"));

    let (mut config, source) = config::load(cli.config.as_deref())?;
    info!("Configuration source: {:?}", source);

    match cli.command {
        Command::Select(args) => {
            commands::select::apply_overrides(&mut config, &args)?;
            let outcome = commands::select::run(&config).await?;
            info!(
                "{} of {} candidates selected ({} in the consensus set)",
                outcome.selected_ids.len(),
                outcome.candidates,
                outcome.consensus_size
            );
            for id in &outcome.selected_ids {
                println!("{id}");
            }
        }
        Command::Hypervolume(args) => {
            if let Some(ref input) = args.input {
                config.input.path = Some(input.display().to_string());
            }
            if let Some(ref id) = args.id_column {
                config.input.id_column = id.clone();
            }
            let hv = commands::hypervolume::resolve(&config, &args)?;
            for point in commands::hypervolume::run(&config, &hv).await? {
                println!("{}", serde_json::to_string(&point)?);
            }
        }
    }

    Ok(())
}
