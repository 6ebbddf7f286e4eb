//! Meshwright CLI - command-line glTF exporter for scene descriptions

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "meshwright")]
#[command(version, about = "Meshwright: scene graph to glTF 2.0 exporter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the Meshwright CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
