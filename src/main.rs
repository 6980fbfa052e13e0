use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod db;
mod dialog;

use commands::{BmiCommand, ChartCommand, DeleteCommand, HistoryCommand, LogCommand, ProfileCommand};
use config::Config;
use db::JsonStore;
use dialog::ConsoleDialog;
use weightlog_core::{IdentityProvider, LocalIdentity, WeightTracker};

#[derive(Parser)]
#[command(name = "weightlog")]
#[command(version)]
#[command(about = "A personal weight tracking application", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a weight measurement (same date overwrites)
    Log(LogCommand),

    /// Show the entry table
    History(HistoryCommand),

    /// Show the chart series
    Chart(ChartCommand),

    /// Delete an entry by id
    Delete(DeleteCommand),

    /// Compute BMI from stored height and a prompted weight
    Bmi(BmiCommand),

    /// Show or update the profile
    Profile(ProfileCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    // Construct collaborators once and inject them; no ambient singletons.
    let store = Arc::new(JsonStore::open(&config.data_path)?);
    let dialog = Arc::new(ConsoleDialog::new());
    let identity = LocalIdentity::new();
    identity.sign_in(config.user.clone());

    let mut tracker = WeightTracker::new(store, dialog);
    tracker.set_user(identity.current_user()).await?;

    match cli.command {
        Some(Commands::Log(cmd)) => cmd.run(&tracker).await?,
        Some(Commands::History(cmd)) => cmd.run(&tracker).await?,
        Some(Commands::Chart(cmd)) => cmd.run(&tracker).await?,
        Some(Commands::Delete(cmd)) => cmd.run(&tracker).await?,
        Some(Commands::Bmi(cmd)) => cmd.run(&tracker).await?,
        Some(Commands::Profile(cmd)) => cmd.run(&tracker).await?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
