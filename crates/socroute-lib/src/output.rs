use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::graph::NodeId;
use crate::routing::{ParetoSets, QueryStats, SearchMode};

/// One Pareto-optimal label of one goal, flattened for tabular output.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ParetoRow {
    pub source: NodeId,
    pub node: NodeId,
    pub time: i64,
    pub min_soc_before: i64,
    pub consumption: i64,
    pub max_soc_after: i64,
}

/// Flatten a query result into rows ordered by goal, then label order.
pub fn pareto_rows(sets: &ParetoSets) -> Vec<ParetoRow> {
    sets.iter()
        .flat_map(|(goal, labels)| {
            labels.iter().map(move |label| ParetoRow {
                source: sets.source,
                node: goal,
                time: label.time(),
                min_soc_before: label.min_soc_before(),
                consumption: label.consumption(),
                max_soc_after: label.max_soc_after(),
            })
        })
        .collect()
}

/// Write every Pareto label as a headed CSV row.
pub fn write_csv<W: Write>(writer: W, sets: &ParetoSets) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = pareto_rows(sets);
    if rows.is_empty() {
        csv_writer.write_record([
            "source",
            "node",
            "time",
            "min_soc_before",
            "consumption",
            "max_soc_after",
        ])?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Structured representation of a query that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuerySummary {
    pub source: NodeId,
    pub mode: SearchMode,
    pub goals: usize,
    pub reached_goals: usize,
    pub total_labels: usize,
    pub stats: QueryStats,
    pub rows: Vec<ParetoRow>,
}

impl QuerySummary {
    pub fn from_sets(sets: &ParetoSets) -> Self {
        Self {
            source: sets.source,
            mode: sets.mode,
            goals: sets.len(),
            reached_goals: sets.reached_goals(),
            total_labels: sets.total_labels(),
            stats: sets.stats,
            rows: pareto_rows(sets),
        }
    }

    /// One-line-per-goal textual rendering for terminals and logs.
    pub fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Query from {} ({} mode): {}/{} goals reached, {} labels, {} iterations",
            self.source,
            self.mode,
            self.reached_goals,
            self.goals,
            self.total_labels,
            self.stats.iterations
        );
        for row in &self.rows {
            let _ = writeln!(
                buffer,
                "{:>8}: time {} soc [{}, {}] consumption {}",
                row.node, row.time, row.min_soc_before, row.max_soc_after, row.consumption
            );
        }
        buffer
    }
}

/// Write the query summary (counters and rows) as pretty-printed JSON.
pub fn write_json<W: Write>(mut writer: W, sets: &ParetoSets) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &QuerySummary::from_sets(sets))?;
    writeln!(writer)?;
    Ok(())
}
