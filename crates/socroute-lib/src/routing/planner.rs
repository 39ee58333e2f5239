//! Search strategies implementing the Strategy pattern.
//!
//! Each [`ParetoPlanner`] encapsulates one search mode: which network the
//! label-setting engine expands over and whether closed-set dominance is
//! answered by the discarding skyline. [`select_planner`] maps a
//! [`SearchMode`] to its strategy so `plan_pareto` stays mode-agnostic.

use tracing::debug;

use crate::cover::Cover;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

use super::bridge::connect_source_to_cover;
use super::options::SearchOptions;
use super::search::{LabelSearch, Network};
use super::{ParetoSets, QueryStats, SearchMode};

/// Trait for Pareto search strategies.
pub trait ParetoPlanner: Send + Sync {
    /// The mode identifier for this planner.
    fn mode(&self) -> SearchMode;

    /// Run the search from `source` and collect the Pareto set of every goal.
    fn search(
        &self,
        graph: &Graph,
        cover: Option<&Cover>,
        source: NodeId,
        options: &SearchOptions,
    ) -> Result<ParetoSets>;

    /// Whether this planner needs a k-path cover.
    fn requires_cover(&self) -> bool {
        false
    }
}

/// Label-setting over the full graph with closed-set dominance checks.
#[derive(Debug, Clone, Default)]
pub struct PlainPlanner;

impl ParetoPlanner for PlainPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Plain
    }

    fn search(
        &self,
        graph: &Graph,
        _cover: Option<&Cover>,
        source: NodeId,
        options: &SearchOptions,
    ) -> Result<ParetoSets> {
        Ok(search_graph(graph, source, options, self.mode()))
    }
}

/// Label-setting over the full graph, discarding against per-node skylines.
#[derive(Debug, Clone, Default)]
pub struct DiscardingPlanner;

impl ParetoPlanner for DiscardingPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Discarding
    }

    fn search(
        &self,
        graph: &Graph,
        _cover: Option<&Cover>,
        source: NodeId,
        options: &SearchOptions,
    ) -> Result<ParetoSets> {
        Ok(search_graph(graph, source, options, self.mode()))
    }
}

/// Label-setting restricted to the cover graph.
#[derive(Debug, Clone, Default)]
pub struct CoverPlanner;

impl ParetoPlanner for CoverPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Cover
    }

    fn search(
        &self,
        graph: &Graph,
        cover: Option<&Cover>,
        source: NodeId,
        options: &SearchOptions,
    ) -> Result<ParetoSets> {
        let cover = cover.ok_or_else(|| Error::CoverRequired {
            mode: self.mode().to_string(),
        })?;
        Ok(search_cover(graph, cover, source, options, self.mode()))
    }

    fn requires_cover(&self) -> bool {
        true
    }
}

/// Label-setting restricted to the cover graph with skyline discarding.
#[derive(Debug, Clone, Default)]
pub struct CoverDiscardingPlanner;

impl ParetoPlanner for CoverDiscardingPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::CoverDiscarding
    }

    fn search(
        &self,
        graph: &Graph,
        cover: Option<&Cover>,
        source: NodeId,
        options: &SearchOptions,
    ) -> Result<ParetoSets> {
        let cover = cover.ok_or_else(|| Error::CoverRequired {
            mode: self.mode().to_string(),
        })?;
        Ok(search_cover(graph, cover, source, options, self.mode()))
    }

    fn requires_cover(&self) -> bool {
        true
    }
}

/// Select the planner implementing `mode`.
pub fn select_planner(mode: SearchMode) -> Box<dyn ParetoPlanner> {
    match mode {
        SearchMode::Plain => Box::new(PlainPlanner),
        SearchMode::Discarding => Box::new(DiscardingPlanner),
        SearchMode::Cover => Box::new(CoverPlanner),
        SearchMode::CoverDiscarding => Box::new(CoverDiscardingPlanner),
    }
}

fn search_graph(
    graph: &Graph,
    source: NodeId,
    options: &SearchOptions,
    mode: SearchMode,
) -> ParetoSets {
    let mut search = LabelSearch::new(graph, Network::Graph, options, source, mode.discards());
    let initial = search.initial_label(source);
    search.seed(initial);
    search.run();
    collect(graph, &search, source, mode, search.stats())
}

fn search_cover(
    graph: &Graph,
    cover: &Cover,
    source: NodeId,
    options: &SearchOptions,
    mode: SearchMode,
) -> ParetoSets {
    let (seeds, bridge_stats) = connect_source_to_cover(graph, cover, source, options);

    let mut search = LabelSearch::new(graph, Network::Cover(cover), options, source, mode.discards());
    for seed in seeds {
        search.seed(seed);
    }
    search.run();

    let stats = search.stats().merged(&bridge_stats);
    collect(graph, &search, source, mode, stats)
}

fn collect(
    graph: &Graph,
    search: &LabelSearch<'_>,
    source: NodeId,
    mode: SearchMode,
    stats: QueryStats,
) -> ParetoSets {
    let sets = graph
        .goals()
        .iter()
        .map(|&goal| (goal, search.closed_sorted(goal)))
        .collect();
    debug!(
        source,
        %mode,
        iterations = stats.iterations,
        labels_created = stats.labels_created,
        dominated = stats.dominated,
        infeasible = stats.infeasible,
        peak_frontier = stats.peak_frontier,
        "pareto search finished"
    );
    ParetoSets::new(source, mode, sets, stats)
}
