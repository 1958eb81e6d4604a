use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod terminal;

use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    LocateCommand, ShowCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "mapty")]
#[command(version)]
#[command(about = "Log running and cycling workouts on a map", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout at a position
    Add(AddCommand),

    /// Edit a workout (submits right away when fields are given)
    Edit(EditCommand),

    /// Delete a workout
    Delete(DeleteCommand),

    /// Delete every workout
    Clear(ClearCommand),

    /// List workouts
    List(ListCommand),

    /// Show a workout and centre the map on it
    Show(ShowCommand),

    /// Centre the map on the current position
    Locate(LocateCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Save config path for config init
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Add(cmd)) => cmd.run(&config),
        Some(Commands::Edit(cmd)) => cmd.run(&config),
        Some(Commands::Delete(cmd)) => cmd.run(&config),
        Some(Commands::Clear(cmd)) => cmd.run(&config),
        Some(Commands::List(cmd)) => cmd.run(&config),
        Some(Commands::Show(cmd)) => cmd.run(&config),
        Some(Commands::Locate(cmd)) => cmd.run(&config),
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}

/// Warnings only by default; `--verbose` or `RUST_LOG` opens it up.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "mapty_core=debug,mapty_cli=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
