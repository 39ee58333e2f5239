// Module exports for CLI subcommands
//
// Each module handles a specific CLI subcommand. main.rs parses arguments and
// dispatches to these handlers.

pub mod cover;
pub mod query;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use socroute_lib::{load_graph, Graph, GraphSources, DEFAULT_BATTERY_CAPACITY};

/// Graph input shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Node CSV file (`id,x,y[,elevation]`).
    #[arg(long)]
    pub nodes: PathBuf,

    /// Edge CSV file (`start,end,time,consumption`).
    #[arg(long)]
    pub edges: PathBuf,

    /// Goal CSV file (`node`).
    #[arg(long)]
    pub goals: Option<PathBuf>,

    /// Mark every n-th node as a goal.
    #[arg(long, value_name = "N")]
    pub goal_stride: Option<usize>,

    /// Battery capacity in consumption units.
    #[arg(long, default_value_t = DEFAULT_BATTERY_CAPACITY)]
    pub battery_capacity: i64,
}

impl GraphArgs {
    pub fn sources(&self) -> GraphSources {
        let mut sources = GraphSources::new(&self.nodes, &self.edges)
            .with_battery_capacity(self.battery_capacity);
        if let Some(goals) = &self.goals {
            sources = sources.with_goals(goals);
        }
        if let Some(stride) = self.goal_stride {
            sources = sources.with_goal_stride(stride);
        }
        sources
    }

    pub fn load(&self) -> Result<Graph> {
        load_graph(&self.sources()).with_context(|| {
            format!(
                "failed to load graph from {} and {}",
                self.nodes.display(),
                self.edges.display()
            )
        })
    }
}
