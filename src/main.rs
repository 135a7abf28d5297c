//! uitest - scenario-driven GUI acceptance test harness
//!
//! Runs YAML acceptance scenarios against a target desktop application
//! through its automation agent.

use clap::Parser;
use uitest::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "uitest", about = "Scenario-driven GUI acceptance test harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    match cli::dispatch(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
