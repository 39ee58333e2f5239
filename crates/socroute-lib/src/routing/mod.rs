//! Pareto route planning.
//!
//! This module provides:
//! - [`SearchMode`] - Supported search variants (plain, discarding, cover, both)
//! - [`SearchOptions`] - Ellipse and epsilon heuristics applied to a query
//! - [`QueryRequest`] - High-level query: source, mode and options
//! - [`ParetoSets`] - Per-goal Pareto-optimal labels returned by a query
//! - [`plan_pareto`] - Main entry point for running a query
//!
//! # Strategy Pattern
//!
//! Each mode is encapsulated in a [`ParetoPlanner`] implementation. All of
//! them drive the same label-setting engine; they differ only in the network
//! they expand over (original graph or k-path cover) and in how closed-set
//! dominance is answered (full scan or discarding skyline).
//!
//! # Example
//!
//! ```ignore
//! use socroute_lib::{build_cover, load_graph, plan_pareto, QueryRequest, SearchMode};
//!
//! let graph = load_graph(&sources)?;
//! let cover = build_cover(&graph, 32)?;
//! let request = QueryRequest::new(100_000, SearchMode::CoverDiscarding);
//! let sets = plan_pareto(&graph, Some(&cover), &request)?;
//! println!("{} labels", sets.total_labels());
//! ```

mod bridge;
mod options;
mod planner;
mod search;
mod skyline;

pub use options::{SearchOptions, DEFAULT_ELLIPSE_COEFFICIENT};
pub use planner::{
    select_planner, CoverDiscardingPlanner, CoverPlanner, DiscardingPlanner, ParetoPlanner,
    PlainPlanner,
};
pub use skyline::Skyline;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cover::Cover;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::label::Label;

/// Supported search variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Label-setting over the full graph.
    Plain,
    /// Full graph, closed-set dominance answered by the discarding skyline.
    Discarding,
    /// Label-setting over the k-path cover.
    Cover,
    /// Cover graph plus discarding skyline.
    #[default]
    CoverDiscarding,
}

impl SearchMode {
    pub const ALL: [SearchMode; 4] = [
        SearchMode::Plain,
        SearchMode::Discarding,
        SearchMode::Cover,
        SearchMode::CoverDiscarding,
    ];

    /// Whether the mode searches the cover graph.
    pub fn uses_cover(self) -> bool {
        matches!(self, SearchMode::Cover | SearchMode::CoverDiscarding)
    }

    /// Whether the mode uses per-node discarding skylines.
    pub fn discards(self) -> bool {
        matches!(self, SearchMode::Discarding | SearchMode::CoverDiscarding)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchMode::Plain => "plain",
            SearchMode::Discarding => "discarding",
            SearchMode::Cover => "cover",
            SearchMode::CoverDiscarding => "cover-discarding",
        };
        f.write_str(value)
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        SearchMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == value)
            .ok_or_else(|| {
                format!(
                    "unknown search mode '{value}'; expected one of: {}",
                    SearchMode::ALL
                        .iter()
                        .map(|mode| mode.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Work counters of a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    /// Labels closed (popped from the frontier).
    pub iterations: usize,
    /// Feasible candidate labels produced by extension.
    pub labels_created: usize,
    /// Candidates rejected or open labels evicted by dominance.
    pub dominated: usize,
    /// Extensions dropped because the SoC window became empty.
    pub infeasible: usize,
    pub peak_frontier: usize,
}

impl QueryStats {
    pub(crate) fn merged(&self, other: &QueryStats) -> QueryStats {
        QueryStats {
            iterations: self.iterations + other.iterations,
            labels_created: self.labels_created + other.labels_created,
            dominated: self.dominated + other.dominated,
            infeasible: self.infeasible + other.infeasible,
            peak_frontier: self.peak_frontier.max(other.peak_frontier),
        }
    }
}

/// High-level query request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub source: NodeId,
    pub mode: SearchMode,
    pub options: SearchOptions,
}

impl QueryRequest {
    /// Request without heuristics.
    pub fn new(source: NodeId, mode: SearchMode) -> Self {
        Self {
            source,
            mode,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Pareto-optimal labels of every declared goal for one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoSets {
    pub source: NodeId,
    pub mode: SearchMode,
    sets: BTreeMap<NodeId, Vec<Label>>,
    pub stats: QueryStats,
}

impl ParetoSets {
    pub(crate) fn new(
        source: NodeId,
        mode: SearchMode,
        sets: BTreeMap<NodeId, Vec<Label>>,
        stats: QueryStats,
    ) -> Self {
        Self {
            source,
            mode,
            sets,
            stats,
        }
    }

    /// Labels of `goal` in label order; `None` when `goal` is not a declared goal.
    pub fn get(&self, goal: NodeId) -> Option<&[Label]> {
        self.sets.get(&goal).map(Vec::as_slice)
    }

    /// Goals and their labels, in increasing goal id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[Label])> + '_ {
        self.sets
            .iter()
            .map(|(goal, labels)| (*goal, labels.as_slice()))
    }

    /// Number of goals in the result.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Goals with at least one feasible path.
    pub fn reached_goals(&self) -> usize {
        self.sets.values().filter(|labels| !labels.is_empty()).count()
    }

    pub fn total_labels(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }
}

/// Run a Pareto query over `graph`, or over `cover` for the cover modes.
pub fn plan_pareto(graph: &Graph, cover: Option<&Cover>, request: &QueryRequest) -> Result<ParetoSets> {
    if !graph.contains_node(request.source) {
        return Err(Error::UnknownNode {
            node: request.source,
            node_count: graph.node_count(),
        });
    }

    let planner = select_planner(request.mode);
    if planner.requires_cover() && cover.is_none() {
        return Err(Error::CoverRequired {
            mode: request.mode.to_string(),
        });
    }

    planner.search(graph, cover, request.source, &request.options)
}
