use std::cmp::Ordering;

use serde::Serialize;

use crate::graph::NodeId;
use crate::params::PathParams;

/// Search state: a node reached with the parameters accumulated from the source.
///
/// Labels are ordered lexicographically over the parameter vector (respecting
/// each dimension's direction) and then by node, so the smallest label of a
/// frontier is always the earliest arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    pub node: NodeId,
    pub params: PathParams,
}

impl Label {
    pub fn new(node: NodeId, params: PathParams) -> Self {
        Self { node, params }
    }

    pub fn time(&self) -> i64 {
        self.params.time
    }

    pub fn min_soc_before(&self) -> i64 {
        self.params.min_soc_before
    }

    pub fn consumption(&self) -> i64 {
        self.params.consumption
    }

    pub fn max_soc_after(&self) -> i64 {
        self.params.max_soc_after
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.params
            .cmp_lexicographic(&other.params)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
