//! Query command handler: Pareto sets from one source to every goal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use socroute_lib::{
    build_cover, plan_pareto, Graph, NodeId, QueryRequest, SearchMode, SearchOptions,
    DEFAULT_ELLIPSE_COEFFICIENT,
};

use super::GraphArgs;
use socroute_cli::output::{emit_results, OutputFormat};

/// Arguments for the query command.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Source node id.
    #[arg(long)]
    pub source: NodeId,

    /// Search mode: plain, discarding, cover or cover-discarding.
    #[arg(long, default_value_t = SearchMode::CoverDiscarding)]
    pub mode: SearchMode,

    /// Path length bound of the cover built for the cover modes.
    #[arg(long, default_value_t = 32)]
    pub k: usize,

    /// Prune nodes outside the ellipse stretched towards this node.
    #[arg(long, value_name = "NODE")]
    pub ellipse_goal: Option<NodeId>,

    /// Ellipse margin as a fraction of the direct source-goal distance
    /// [default: 0.5].
    #[arg(long, requires = "ellipse_goal")]
    pub ellipse_coefficient: Option<f64>,

    /// Epsilon-dominance coefficients, one per path parameter.
    #[arg(long, value_delimiter = ',', num_args = 1.., value_name = "E")]
    pub epsilon: Option<Vec<f64>>,

    /// Result format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Write results to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl QueryArgs {
    /// Map the heuristic flags onto search options for `graph`.
    pub fn search_options(&self, graph: &Graph) -> Result<SearchOptions> {
        let mut options = SearchOptions::new();
        if let Some(goal) = self.ellipse_goal {
            options
                .set_ellipse_goal(graph, goal)
                .context("invalid --ellipse-goal")?;
            options.set_ellipse_usage(true)?;
            options
                .set_ellipse_coefficient(
                    self.ellipse_coefficient
                        .unwrap_or(DEFAULT_ELLIPSE_COEFFICIENT),
                )
                .context("invalid --ellipse-coefficient")?;
        }
        if let Some(epsilon) = &self.epsilon {
            options
                .set_epsilon_coefficients(epsilon)
                .context("invalid --epsilon")?;
            options.set_epsilon_usage(true)?;
        }
        Ok(options)
    }
}

/// Handle the query subcommand.
pub fn handle_query(args: &QueryArgs) -> Result<()> {
    let graph = args.graph.load()?;
    let options = args.search_options(&graph)?;

    let cover = if args.mode.uses_cover() {
        Some(
            build_cover(&graph, args.k)
                .with_context(|| format!("failed to build k-path cover with k = {}", args.k))?,
        )
    } else {
        None
    };

    let request = QueryRequest::new(args.source, args.mode).with_options(options);
    let sets = plan_pareto(&graph, cover.as_ref(), &request)
        .with_context(|| format!("query from node {} failed", args.source))?;
    info!(
        source = args.source,
        mode = %args.mode,
        reached_goals = sets.reached_goals(),
        total_labels = sets.total_labels(),
        "query finished"
    );

    emit_results(&sets, args.format, args.output.as_deref())
}
