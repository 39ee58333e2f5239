//! Connecting a query source to the k-path cover.
//!
//! Cover searches only move between cover vertices. A source outside the
//! cover is first linked to the cover vertices it can reach through non-cover
//! vertices by a label-setting search over the original graph; the
//! non-dominated labels arriving at each cover vertex become the seeds of the
//! cover search.

use tracing::debug;

use crate::cover::Cover;
use crate::graph::{Graph, NodeId};
use crate::label::Label;

use super::options::SearchOptions;
use super::search::{LabelSearch, Network};
use super::QueryStats;

/// Seeds for a cover search started at `source`, together with the work done
/// to find them.
pub(crate) fn connect_source_to_cover(
    graph: &Graph,
    cover: &Cover,
    source: NodeId,
    options: &SearchOptions,
) -> (Vec<Label>, QueryStats) {
    let mut search =
        LabelSearch::new(graph, Network::Graph, options, source, false).with_boundary(cover);
    let initial = search.initial_label(source);

    if cover.in_cover(source) {
        return (vec![initial], QueryStats::default());
    }

    search.seed(initial);
    search.run();
    let seeds = search.boundary_labels();
    debug!(
        source,
        seeds = seeds.len(),
        iterations = search.stats().iterations,
        "connected source to cover"
    );
    (seeds, search.stats())
}
