use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    batch::{self, BatchArgs},
    run::{self, RunArgs},
    version::{self, VersionArgs},
};

mod commands;
mod config;
mod input;
mod render;
mod summary;

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Instant-runoff and open-party-list election tabulation")]
struct Cli {
    /// Log every round and seat award.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate one election and write its summary and reports.
    Run(RunArgs),
    /// Tabulate several elections with seeds derived from one master seed.
    Batch(BatchArgs),
    /// Print the tool version.
    Version(VersionArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "tally=debug" } else { "tally=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Batch(args) => batch::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
