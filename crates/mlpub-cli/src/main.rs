//! mlpub CLI - publish machine learning models as cloud functions

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

mod commands;
mod exit_codes;
mod util;

#[derive(Parser)]
#[command(name = "mlpub")]
#[command(author = "mlpub Contributors")]
#[command(version)]
#[command(about = "Publish machine learning models as cloud functions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the project described by mlpub.yaml
    #[command(alias = "push")]
    Deploy {
        /// Project root
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate an mlpub configuration file
    #[command(alias = "validate")]
    Check {
        /// Config file path
        #[arg(short, long, default_value = "./mlpub.yaml")]
        config: PathBuf,

        /// Output the parsed configuration as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread interacting with the env at this point
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    match cli.command {
        Commands::Deploy { path } => commands::deploy::run(&path).await,
        Commands::Check { config, json } => commands::check::run(&config, json),
    }
}
