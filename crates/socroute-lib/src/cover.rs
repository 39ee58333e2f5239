//! k-path cover (KPC) construction.
//!
//! The cover keeps a subset of vertices such that long paths always pass
//! through a cover vertex, and replaces every stretch of non-cover vertices
//! between two cover vertices by composite [`CoverEdge`]s. Only the
//! non-dominated composite edges of each cover vertex pair are kept, so a
//! label-setting search over the cover touches far fewer vertices while
//! producing the same Pareto sets at cover vertices.
//!
//! Vertex selection is a sequential greedy elimination in increasing node id
//! order; the result depends on that order and is not a minimum cover.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, NodeId};
use crate::params::{PathParams, Suffix};

/// Emit a progress line every this many processed vertices.
const PROGRESS_INTERVAL: usize = 10_000;

/// Composite edge of the cover graph: a loop-free path between two cover
/// vertices whose interior vertices are all outside the cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverEdge {
    nodes: Vec<NodeId>,
    params: PathParams,
}

impl CoverEdge {
    /// Zero-length path at `node` with a fully charged battery.
    pub fn trivial(node: NodeId, capacity: i64) -> Self {
        Self::from_parts(vec![node], PathParams::initial(capacity))
    }

    pub(crate) fn from_parts(nodes: Vec<NodeId>, params: PathParams) -> Self {
        Self { nodes, params }
    }

    /// First vertex of the node sequence.
    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    /// Last vertex of the node sequence.
    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Number of original edges represented by this cover edge.
    pub fn hop_count(&self) -> usize {
        self.nodes.len() - 1
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    fn link(&self, edge: &Edge, capacity: i64) -> CoverEdge {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(edge.end);
        CoverEdge::from_parts(nodes, self.params.extend(Suffix::Edge(edge), capacity))
    }
}

/// Counters describing a built cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverStats {
    pub k: usize,
    pub node_count: usize,
    pub cover_node_count: usize,
    pub edge_count: usize,
    /// Feasible composite edges found before domination pruning.
    pub candidate_cover_edges: usize,
    /// Composite edges kept after domination pruning.
    pub cover_edge_count: usize,
    pub domination_pruned: usize,
}

impl CoverStats {
    /// Share of the original vertices kept in the cover, in percent.
    pub fn cover_node_percentage(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        self.cover_node_count as f64 / self.node_count as f64 * 100.0
    }

    /// Share of candidate cover edges removed by domination, in percent.
    pub fn pruned_edge_percentage(&self) -> f64 {
        if self.candidate_cover_edges == 0 {
            return 0.0;
        }
        (self.candidate_cover_edges - self.cover_edge_count) as f64
            / self.candidate_cover_edges as f64
            * 100.0
    }
}

/// Immutable k-path cover of a [`Graph`].
#[derive(Debug, Clone)]
pub struct Cover {
    k: usize,
    in_cover: Vec<bool>,
    outgoing: Vec<BTreeMap<NodeId, Vec<CoverEdge>>>,
    stats: CoverStats,
}

impl Cover {
    /// Path length bound the cover was built for.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn in_cover(&self, node: NodeId) -> bool {
        self.in_cover[node]
    }

    pub fn cover_node_count(&self) -> usize {
        self.stats.cover_node_count
    }

    /// Cover vertices in increasing id order.
    pub fn cover_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.in_cover
            .iter()
            .enumerate()
            .filter_map(|(node, &kept)| kept.then_some(node))
    }

    /// Non-dominated cover edges leaving `node`, keyed by destination cover
    /// vertex. Returns `None` when `node` is not in the cover.
    pub fn outgoing_cover_edges(&self, node: NodeId) -> Option<&BTreeMap<NodeId, Vec<CoverEdge>>> {
        if !self.in_cover[node] {
            return None;
        }
        Some(&self.outgoing[node])
    }

    /// Cover edges from `from` to `to`; empty when the pair is not connected.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> &[CoverEdge] {
        self.outgoing[from]
            .get(&to)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cover_edge_count(&self) -> usize {
        self.stats.cover_edge_count
    }

    pub fn stats(&self) -> &CoverStats {
        &self.stats
    }
}

/// Build the k-path cover of `graph` for path bound `k` (`k >= 2`).
pub fn build_cover(graph: &Graph, k: usize) -> Result<Cover> {
    if k < 2 {
        return Err(Error::InvalidCoverBound { k });
    }

    let started = Instant::now();
    info!(k, node_count = graph.node_count(), "starting k-path cover construction");

    let in_cover = select_cover_vertices(graph, k);
    let cover_node_count = in_cover.iter().filter(|kept| **kept).count();
    info!(
        node_count = graph.node_count(),
        cover_node_count,
        "selected cover vertices"
    );

    let mut stats = CoverStats {
        k,
        node_count: graph.node_count(),
        cover_node_count,
        edge_count: graph.edge_count(),
        ..CoverStats::default()
    };
    let outgoing = build_cover_edges(graph, &in_cover, &mut stats);

    info!(
        k,
        cover_node_count = stats.cover_node_count,
        candidate_cover_edges = stats.candidate_cover_edges,
        cover_edge_count = stats.cover_edge_count,
        domination_pruned = stats.domination_pruned,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "finished k-path cover construction"
    );

    Ok(Cover {
        k,
        in_cover,
        outgoing,
        stats,
    })
}

fn select_cover_vertices(graph: &Graph, k: usize) -> Vec<bool> {
    let mut in_cover = vec![true; graph.node_count()];
    for node in 0..graph.node_count() {
        if node % PROGRESS_INTERVAL == 0 {
            debug!(node, "cover vertex selection progress");
        }
        if graph.is_goal(node) {
            continue;
        }
        if !must_stay(graph, &in_cover, node, k) {
            in_cover[node] = false;
        }
    }
    in_cover
}

/// A vertex must stay when removing it would leave a path of `k - 1` vertices
/// that avoids the current cover.
fn must_stay(graph: &Graph, in_cover: &[bool], node: NodeId, k: usize) -> bool {
    // Every loop-free forward path from `node` through non-cover vertices,
    // including dead ends.
    let mut completed: HashSet<Vec<NodeId>> = HashSet::new();
    let mut stack = vec![vec![node]];
    while let Some(path) = stack.pop() {
        if path.len() + 1 >= k {
            return true;
        }
        let Some(&last) = path.last() else {
            continue;
        };
        for edge in graph.outgoing_edges(last) {
            let next = edge.end;
            if path.contains(&next) || in_cover[next] {
                continue;
            }
            let mut extended = path.clone();
            extended.push(next);
            stack.push(extended);
        }
        completed.insert(path);
    }

    for initial in completed {
        let mut stack = vec![initial];
        while let Some(path) = stack.pop() {
            if path.len() + 1 >= k {
                return true;
            }
            let first = path[0];
            for edge in graph.incoming_edges(first) {
                let previous = edge.start;
                if path.contains(&previous) || in_cover[previous] {
                    continue;
                }
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.push(previous);
                extended.extend_from_slice(&path);
                stack.push(extended);
            }
        }
    }

    false
}

fn build_cover_edges(
    graph: &Graph,
    in_cover: &[bool],
    stats: &mut CoverStats,
) -> Vec<BTreeMap<NodeId, Vec<CoverEdge>>> {
    let capacity = graph.battery_capacity();
    let mut outgoing = vec![BTreeMap::new(); graph.node_count()];

    for (origin, edges) in outgoing.iter_mut().enumerate() {
        if !in_cover[origin] {
            continue;
        }

        let mut stack = vec![CoverEdge::trivial(origin, capacity)];
        while let Some(current) = stack.pop() {
            for edge in graph.outgoing_edges(current.end()) {
                let next = edge.end;
                if current.contains(next) {
                    continue;
                }

                let extended = current.link(edge, capacity);
                if extended.params.is_infeasible(capacity) {
                    continue;
                }

                if in_cover[next] {
                    stats.candidate_cover_edges += 1;
                    let bucket: &mut Vec<CoverEdge> = edges.entry(next).or_default();
                    stats.domination_pruned += insert_non_dominated(bucket, extended);
                    continue;
                }

                stack.push(extended);
            }
        }
    }

    stats.cover_edge_count = outgoing
        .iter()
        .flat_map(|edges| edges.values())
        .map(Vec::len)
        .sum();
    outgoing
}

/// Insert `candidate` unless an existing edge dominates it, dropping the
/// existing edges it dominates. Returns how many edges were pruned.
fn insert_non_dominated(bucket: &mut Vec<CoverEdge>, candidate: CoverEdge) -> usize {
    if bucket
        .iter()
        .any(|existing| existing.params.dominates(&candidate.params))
    {
        return 1;
    }
    let before = bucket.len();
    bucket.retain(|existing| !candidate.params.dominates(&existing.params));
    let removed = before - bucket.len();
    bucket.push(candidate);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn chain(goal: NodeId) -> Graph {
        let mut builder = GraphBuilder::new().with_nodes(4);
        builder
            .add_edge(0, 1, 1, 0)
            .add_edge(1, 2, 1, 0)
            .add_edge(2, 3, 1, 0)
            .add_goal(goal);
        builder.build().expect("valid chain")
    }

    fn members(cover: &Cover) -> Vec<NodeId> {
        cover.cover_nodes().collect()
    }

    #[test]
    fn rejects_degenerate_bound() {
        let graph = chain(3);
        assert!(matches!(
            build_cover(&graph, 1),
            Err(Error::InvalidCoverBound { k: 1 })
        ));
    }

    #[test]
    fn bound_two_keeps_every_chain_vertex() {
        let cover = build_cover(&chain(3), 2).expect("cover builds");
        assert_eq!(members(&cover), vec![0, 1, 2, 3]);
        assert_eq!(cover.cover_edge_count(), 3);
    }

    #[test]
    fn bound_three_drops_alternate_chain_vertices() {
        let cover = build_cover(&chain(3), 3).expect("cover builds");
        assert_eq!(members(&cover), vec![1, 3]);

        let edges = cover.edges_between(1, 3);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].nodes(), &[1, 2, 3]);
        assert_eq!(edges[0].params().time, 2);
        assert_eq!(edges[0].hop_count(), 2);
        assert!(cover.outgoing_cover_edges(0).is_none());
    }

    #[test]
    fn dead_end_forward_paths_still_extend_backwards() {
        // 1 -> 2 -> 0: node 2 has no long forward path on its own, but the
        // dead end [2, 0] grows backwards into [1, 2, 0].
        let mut builder = GraphBuilder::new().with_nodes(3);
        builder.add_edge(1, 2, 1, 0).add_edge(2, 0, 1, 0);
        let graph = builder.build().expect("valid graph");

        let cover = build_cover(&graph, 4).expect("cover builds");
        assert_eq!(members(&cover), vec![2]);
    }

    #[test]
    fn insert_non_dominated_keeps_antichain() {
        let slow = CoverEdge::from_parts(vec![0, 1], PathParams::from_values([5, 10, 10, 90]));
        let fast = CoverEdge::from_parts(vec![0, 1], PathParams::from_values([3, 20, 20, 80]));
        let best = CoverEdge::from_parts(vec![0, 2, 1], PathParams::from_values([3, 10, 10, 90]));

        let mut bucket = Vec::new();
        assert_eq!(insert_non_dominated(&mut bucket, slow.clone()), 0);
        assert_eq!(insert_non_dominated(&mut bucket, fast), 0);
        assert_eq!(bucket.len(), 2);
        assert_eq!(insert_non_dominated(&mut bucket, best.clone()), 2);
        assert_eq!(bucket, vec![best]);
        assert_eq!(insert_non_dominated(&mut bucket, slow), 1);
    }

    #[test]
    fn stats_report_percentages() {
        let cover = build_cover(&chain(3), 3).expect("cover builds");
        let stats = cover.stats();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.cover_node_count, 2);
        assert!((stats.cover_node_percentage() - 50.0).abs() < 1e-9);
        assert_eq!(stats.pruned_edge_percentage(), 0.0);
    }
}
