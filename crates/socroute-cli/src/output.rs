//! Output formatting for cover statistics and query results.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use socroute_lib::{write_csv, write_json, CoverStats, ParetoSets};

/// Format used for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One row per Pareto-optimal label.
    #[default]
    Csv,
    /// Summary object with counters and rows.
    Json,
}

/// Cover statistics as printed by `socroute cover --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CoverReport {
    #[serde(flatten)]
    pub stats: CoverStats,
    pub cover_node_percentage: f64,
    pub pruned_edge_percentage: f64,
}

impl From<&CoverStats> for CoverReport {
    fn from(stats: &CoverStats) -> Self {
        Self {
            stats: *stats,
            cover_node_percentage: stats.cover_node_percentage(),
            pruned_edge_percentage: stats.pruned_edge_percentage(),
        }
    }
}

impl CoverReport {
    pub fn render_plain(&self) -> String {
        let stats = &self.stats;
        format!(
            "k-path cover (k = {})\n  nodes:       {} of {} ({:.1}%)\n  cover edges: {} kept of {} candidates ({:.1}% pruned)\n  graph edges: {}\n",
            stats.k,
            stats.cover_node_count,
            stats.node_count,
            self.cover_node_percentage,
            stats.cover_edge_count,
            stats.candidate_cover_edges,
            self.pruned_edge_percentage,
            stats.edge_count
        )
    }
}

/// Write query results to `path`, or to stdout when no path is given.
pub fn emit_results(sets: &ParetoSets, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_results(&mut writer, sets, format)?;
            writer
                .flush()
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_results(&mut handle, sets, format)
        }
    }
}

fn write_results<W: Write>(writer: W, sets: &ParetoSets, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, sets).context("failed to write CSV results"),
        OutputFormat::Json => write_json(writer, sets).context("failed to write JSON results"),
    }
}
