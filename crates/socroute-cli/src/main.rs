mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::cover::{handle_cover, CoverArgs};
use commands::query::{handle_query, QueryArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Battery-constrained Pareto routing on road graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a k-path cover and report its statistics.
    Cover(CoverArgs),
    /// Compute the Pareto sets from a source to every goal.
    Query(QueryArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Cover(args) => handle_cover(args),
        Command::Query(args) => handle_query(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
