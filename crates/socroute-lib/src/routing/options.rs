//! Per-query search configuration.
//!
//! A [`SearchOptions`] value is assembled up front and handed to a planner by
//! reference, so concurrent queries never observe each other's settings.
//! Every setter validates its input and leaves the options untouched when it
//! returns an error.

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::graph::{Graph, Node, NodeId};
use crate::params::{Dominance, NUM_PATH_PARAMETERS};

/// Default ellipse margin, as a fraction of the direct source-goal distance.
pub const DEFAULT_ELLIPSE_COEFFICIENT: f64 = 0.5;

/// Heuristic settings shared by all search modes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOptions {
    epsilons: Option<[f64; NUM_PATH_PARAMETERS]>,
    use_epsilon: bool,
    ellipse_goal: Option<NodeId>,
    use_ellipse: bool,
    ellipse_coefficient: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            epsilons: None,
            use_epsilon: false,
            ellipse_goal: None,
            use_ellipse: false,
            ellipse_coefficient: DEFAULT_ELLIPSE_COEFFICIENT,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the goal the ellipse heuristic is stretched towards.
    pub fn set_ellipse_goal(&mut self, graph: &Graph, node: NodeId) -> Result<()> {
        if !graph.contains_node(node) {
            return Err(Error::UnknownNode {
                node,
                node_count: graph.node_count(),
            });
        }
        self.ellipse_goal = Some(node);
        Ok(())
    }

    /// Store epsilon-dominance coefficients; one per dimension, each in `[0, 1]`.
    pub fn set_epsilon_coefficients(&mut self, values: &[f64]) -> Result<()> {
        let coefficients: [f64; NUM_PATH_PARAMETERS] = values
            .try_into()
            .map_err(|_| Error::invalid_epsilon(values))?;
        if coefficients
            .iter()
            .any(|value| !(0.0..=1.0).contains(value))
        {
            return Err(Error::invalid_epsilon(values));
        }
        self.epsilons = Some(coefficients);
        Ok(())
    }

    /// Toggle epsilon dominance. Enabling requires configured coefficients.
    pub fn set_epsilon_usage(&mut self, enable: bool) -> Result<()> {
        if enable && self.epsilons.is_none() {
            return Err(Error::EpsilonCoefficientsMissing);
        }
        self.use_epsilon = enable;
        Ok(())
    }

    /// Toggle ellipse pruning. Enabling requires a configured ellipse goal.
    pub fn set_ellipse_usage(&mut self, enable: bool) -> Result<()> {
        if enable && self.ellipse_goal.is_none() {
            return Err(Error::EllipseGoalMissing);
        }
        self.use_ellipse = enable;
        Ok(())
    }

    /// Margin of the ellipse as a fraction of the direct source-goal distance.
    pub fn set_ellipse_coefficient(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidEllipseCoefficient { value });
        }
        if !self.use_ellipse {
            warn!(value, "ellipse coefficient set while ellipse pruning is disabled");
        }
        self.ellipse_coefficient = value;
        Ok(())
    }

    pub fn epsilon_coefficients(&self) -> Option<&[f64; NUM_PATH_PARAMETERS]> {
        self.epsilons.as_ref()
    }

    pub fn uses_epsilon(&self) -> bool {
        self.use_epsilon
    }

    pub fn ellipse_goal(&self) -> Option<NodeId> {
        self.ellipse_goal
    }

    pub fn uses_ellipse(&self) -> bool {
        self.use_ellipse
    }

    pub fn ellipse_coefficient(&self) -> f64 {
        self.ellipse_coefficient
    }

    /// Dominance relation every comparison of the query uses.
    pub fn dominance(&self) -> Dominance {
        match (self.use_epsilon, self.epsilons) {
            (true, Some(epsilons)) => Dominance::Epsilon(epsilons),
            _ => Dominance::Exact,
        }
    }

    /// Ellipse around `source` and the configured goal, when pruning is enabled.
    pub(crate) fn ellipse(&self, graph: &Graph, source: NodeId) -> Option<Ellipse> {
        if !self.use_ellipse {
            return None;
        }
        let goal = *graph.node(self.ellipse_goal?);
        let source = *graph.node(source);
        let direct = source.distance_to(&goal);
        Some(Ellipse {
            source,
            goal,
            bound: direct + 2.0 * direct * self.ellipse_coefficient,
        })
    }
}

/// Region of nodes whose detour through them stays within the configured margin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ellipse {
    source: Node,
    goal: Node,
    bound: f64,
}

impl Ellipse {
    pub(crate) fn contains(&self, node: &Node) -> bool {
        self.source.distance_to(node) + node.distance_to(&self.goal) <= self.bound
    }
}
