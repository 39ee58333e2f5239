//! Cover command handler: builds a k-path cover and reports its statistics.

use anyhow::{Context, Result};
use clap::Args;

use socroute_lib::build_cover;

use super::GraphArgs;
use socroute_cli::output::CoverReport;

/// Arguments for the cover command.
#[derive(Args, Debug, Clone)]
pub struct CoverArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Path length bound of the cover.
    #[arg(long, default_value_t = 32)]
    pub k: usize,

    /// Print statistics as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Handle the cover subcommand.
pub fn handle_cover(args: &CoverArgs) -> Result<()> {
    let graph = args.graph.load()?;
    let cover = build_cover(&graph, args.k)
        .with_context(|| format!("failed to build k-path cover with k = {}", args.k))?;

    let report = CoverReport::from(cover.stats());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_plain());
    }
    Ok(())
}
