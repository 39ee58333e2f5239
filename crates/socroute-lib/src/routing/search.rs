//! Multi-criteria label-setting engine shared by every search mode.
//!
//! The engine keeps, per node, a volatile open set and a permanent closed set,
//! plus a global frontier ordered by [`Label`]. The smallest open label is
//! closed and extended along the outgoing edges (or cover edges) of its node;
//! a candidate survives when it is feasible, not dominated by what is already
//! closed at its node, and not dominated by an open label there. Surviving
//! candidates evict the open labels they dominate.

use std::collections::{BTreeSet, HashSet};

use crate::cover::Cover;
use crate::graph::{Graph, NodeId};
use crate::label::Label;
use crate::params::{Dominance, PathParams, Suffix};

use super::options::{Ellipse, SearchOptions};
use super::skyline::Skyline;
use super::QueryStats;

/// Adjacency the engine expands over.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Network<'a> {
    /// Original graph edges.
    Graph,
    /// Composite edges of a k-path cover.
    Cover(&'a Cover),
}

pub(crate) struct LabelSearch<'a> {
    graph: &'a Graph,
    network: Network<'a>,
    dominance: Dominance,
    ellipse: Option<Ellipse>,
    capacity: i64,
    /// Labels reaching a node of this cover are parked in its open set and
    /// never expanded.
    boundary: Option<&'a Cover>,
    open: Vec<HashSet<Label>>,
    closed: Vec<Vec<Label>>,
    skylines: Option<Vec<Skyline>>,
    frontier: BTreeSet<Label>,
    stats: QueryStats,
}

impl<'a> LabelSearch<'a> {
    pub(crate) fn new(
        graph: &'a Graph,
        network: Network<'a>,
        options: &SearchOptions,
        source: NodeId,
        discarding: bool,
    ) -> Self {
        let node_count = graph.node_count();
        Self {
            graph,
            network,
            dominance: options.dominance(),
            ellipse: options.ellipse(graph, source),
            capacity: graph.battery_capacity(),
            boundary: None,
            open: vec![HashSet::new(); node_count],
            closed: vec![Vec::new(); node_count],
            skylines: discarding.then(|| vec![Skyline::default(); node_count]),
            frontier: BTreeSet::new(),
            stats: QueryStats::default(),
        }
    }

    /// Stop expansion at the vertices of `cover`.
    pub(crate) fn with_boundary(mut self, cover: &'a Cover) -> Self {
        self.boundary = Some(cover);
        self
    }

    pub(crate) fn initial_label(&self, source: NodeId) -> Label {
        Label::new(source, PathParams::initial(self.capacity))
    }

    /// Make `label` open at its node and, unless it sits on the boundary,
    /// schedule it for expansion.
    pub(crate) fn seed(&mut self, label: Label) {
        self.open[label.node].insert(label);
        if !self.on_boundary(label.node) {
            self.frontier.insert(label);
        }
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
    }

    /// Run until the frontier is exhausted.
    pub(crate) fn run(&mut self) {
        while let Some(current) = self.frontier.pop_first() {
            self.stats.iterations += 1;
            self.open[current.node].remove(&current);
            self.close(current);

            let network = self.network;
            match network {
                Network::Graph => {
                    let graph = self.graph;
                    for edge in graph.outgoing_edges(current.node) {
                        if !self.admits(edge.end) {
                            continue;
                        }
                        self.relax(&current, edge.end, Suffix::Edge(edge));
                    }
                }
                Network::Cover(cover) => {
                    let Some(destinations) = cover.outgoing_cover_edges(current.node) else {
                        continue;
                    };
                    for (&next, cover_edges) in destinations {
                        if !self.admits(next) {
                            continue;
                        }
                        for cover_edge in cover_edges {
                            self.relax(&current, next, Suffix::Cover(cover_edge));
                        }
                    }
                }
            }
        }
    }

    fn close(&mut self, label: Label) {
        if let Some(skylines) = self.skylines.as_mut() {
            skylines[label.node].insert(&label.params);
        }
        self.closed[label.node].push(label);
    }

    fn admits(&self, node: NodeId) -> bool {
        self.ellipse
            .map_or(true, |ellipse| ellipse.contains(self.graph.node(node)))
    }

    fn on_boundary(&self, node: NodeId) -> bool {
        self.boundary.is_some_and(|cover| cover.in_cover(node))
    }

    fn relax(&mut self, current: &Label, next: NodeId, suffix: Suffix<'_>) {
        let params = current.params.extend(suffix, self.capacity);
        if params.is_infeasible(self.capacity) {
            self.stats.infeasible += 1;
            return;
        }
        self.stats.labels_created += 1;

        let candidate = Label::new(next, params);
        if self.dominated_by_closed(&candidate) {
            self.stats.dominated += 1;
            return;
        }

        let dominance = self.dominance;
        let open = &mut self.open[next];
        if open
            .iter()
            .any(|existing| dominance.dominates(&existing.params, &candidate.params))
        {
            self.stats.dominated += 1;
            return;
        }

        let evicted: Vec<Label> = open
            .iter()
            .filter(|existing| dominance.dominates(&candidate.params, &existing.params))
            .copied()
            .collect();
        for label in &evicted {
            open.remove(label);
            self.frontier.remove(label);
        }
        self.stats.dominated += evicted.len();

        self.seed(candidate);
    }

    fn dominated_by_closed(&self, candidate: &Label) -> bool {
        match &self.skylines {
            Some(skylines) => skylines[candidate.node].discards(&candidate.params, &self.dominance),
            None => self.closed[candidate.node]
                .iter()
                .any(|closed| self.dominance.dominates(&closed.params, &candidate.params)),
        }
    }

    /// Open labels parked at each boundary vertex, in node order.
    pub(crate) fn boundary_labels(&self) -> Vec<Label> {
        let mut labels = Vec::new();
        for (node, open) in self.open.iter().enumerate() {
            if !self.on_boundary(node) {
                continue;
            }
            let mut parked: Vec<Label> = open.iter().copied().collect();
            parked.sort();
            labels.extend(parked);
        }
        labels
    }

    pub(crate) fn stats(&self) -> QueryStats {
        self.stats
    }

    /// Closed labels of `node` in label order.
    pub(crate) fn closed_sorted(&self, node: NodeId) -> Vec<Label> {
        let mut labels = self.closed[node].clone();
        labels.sort();
        labels
    }
}
