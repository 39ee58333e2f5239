//! Path parameter model shared by the cover builder and the planners.
//!
//! Every partial path is summarised by a [`PathParams`] vector
//! `[time, minSoCBefore, consumption, maxSoCAfter]`. Extending a path by an
//! edge or a cover edge is done with [`PathParams::extend`], and paths are
//! compared with the weak Pareto relation of [`Dominance`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cover::CoverEdge;
use crate::graph::Edge;

/// Dimensionality of the path parameter vector.
pub const NUM_PATH_PARAMETERS: usize = 4;

/// Optimisation direction per dimension: only `maxSoCAfter` is maximised.
pub const MAXIMIZE: [bool; NUM_PATH_PARAMETERS] = [false, false, false, true];

/// Aggregated parameters of a (partial) path.
///
/// `min_soc_before` is the lowest state of charge the path can be started
/// with, `max_soc_after` the highest state of charge it can end with, and
/// `consumption` the net energy spent when started at `min_soc_before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathParams {
    pub time: i64,
    pub min_soc_before: i64,
    pub consumption: i64,
    pub max_soc_after: i64,
}

/// Segment appended to a path during composition.
///
/// The two variants use distinct update rules: a bare edge only knows its
/// consumption, while a cover edge already carries its own SoC window.
#[derive(Debug, Clone, Copy)]
pub enum Suffix<'a> {
    Edge(&'a Edge),
    Cover(&'a CoverEdge),
}

impl PathParams {
    /// Parameters of the empty path at a fully charged battery.
    pub fn initial(capacity: i64) -> Self {
        Self {
            time: 0,
            min_soc_before: 0,
            consumption: 0,
            max_soc_after: capacity,
        }
    }

    pub fn from_values(values: [i64; NUM_PATH_PARAMETERS]) -> Self {
        let [time, min_soc_before, consumption, max_soc_after] = values;
        Self {
            time,
            min_soc_before,
            consumption,
            max_soc_after,
        }
    }

    /// Values in dimension order `[time, minSoCBefore, consumption, maxSoCAfter]`.
    pub fn values(&self) -> [i64; NUM_PATH_PARAMETERS] {
        [
            self.time,
            self.min_soc_before,
            self.consumption,
            self.max_soc_after,
        ]
    }

    /// Every dimension except time, used by the discarding skyline.
    pub fn tail(&self) -> [i64; NUM_PATH_PARAMETERS - 1] {
        [self.min_soc_before, self.consumption, self.max_soc_after]
    }

    /// A path is infeasible when no SoC in `[0, capacity]` can complete it.
    pub fn is_infeasible(&self, capacity: i64) -> bool {
        self.min_soc_before > capacity || self.max_soc_after < 0
    }

    /// Compose `self` (prefix) with `suffix`, selecting the rule by suffix kind.
    pub fn extend(&self, suffix: Suffix<'_>, capacity: i64) -> PathParams {
        match suffix {
            Suffix::Edge(edge) => self.extend_edge(edge, capacity),
            Suffix::Cover(cover_edge) => self.extend_cover(cover_edge.params()),
        }
    }

    fn extend_edge(&self, edge: &Edge, capacity: i64) -> PathParams {
        let used = edge.consumption;
        let window_top = capacity.min(capacity - used);
        PathParams {
            time: self.time.saturating_add(edge.time),
            min_soc_before: self.min_soc_before.max(self.consumption + used.max(0)),
            consumption: (self.consumption + used).max(self.min_soc_before - window_top),
            max_soc_after: (self.max_soc_after - used).min(window_top),
        }
    }

    fn extend_cover(&self, suffix: &PathParams) -> PathParams {
        PathParams {
            time: self.time.saturating_add(suffix.time),
            min_soc_before: self
                .min_soc_before
                .max(self.consumption + suffix.min_soc_before),
            consumption: (self.consumption + suffix.consumption)
                .max(self.min_soc_before - suffix.max_soc_after),
            max_soc_after: (self.max_soc_after - suffix.consumption).min(suffix.max_soc_after),
        }
    }

    /// Weak Pareto dominance: `self` is at least as good in every dimension.
    pub fn dominates(&self, other: &PathParams) -> bool {
        self.values()
            .iter()
            .zip(other.values().iter())
            .zip(MAXIMIZE.iter())
            .all(|((&a, &b), &maximize)| if maximize { a >= b } else { a <= b })
    }

    /// Lexicographic order respecting each dimension's direction.
    pub fn cmp_lexicographic(&self, other: &PathParams) -> Ordering {
        compare_directed(&self.values(), &other.values(), &MAXIMIZE)
    }
}

pub(crate) fn compare_directed(a: &[i64], b: &[i64], maximize: &[bool]) -> Ordering {
    for ((x, y), &max) in a.iter().zip(b.iter()).zip(maximize.iter()) {
        let ordering = if max { y.cmp(x) } else { x.cmp(y) };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Dominance relation used by a search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dominance {
    /// Weak Pareto dominance.
    #[default]
    Exact,
    /// Loose dominance against coefficient-scaled values. With coefficients
    /// below one, minimised values of the dominating vector are shrunk and
    /// maximised values of the dominated vector are shrunk.
    Epsilon([f64; NUM_PATH_PARAMETERS]),
}

impl Dominance {
    /// Whether `a` dominates `b` under this relation.
    pub fn dominates(&self, a: &PathParams, b: &PathParams) -> bool {
        match self {
            Dominance::Exact => a.dominates(b),
            Dominance::Epsilon(epsilons) => {
                epsilon_dominates(&a.values(), &b.values(), epsilons, &MAXIMIZE)
            }
        }
    }

    /// Whether a skyline tail vector dominates the tail of `b`.
    pub fn tail_dominates(&self, tail: &[i64; NUM_PATH_PARAMETERS - 1], b: &PathParams) -> bool {
        let maximize = &MAXIMIZE[1..];
        match self {
            Dominance::Exact => tail
                .iter()
                .zip(b.tail().iter())
                .zip(maximize.iter())
                .all(|((&a, &b), &max)| if max { a >= b } else { a <= b }),
            Dominance::Epsilon(epsilons) => {
                epsilon_dominates(tail, &b.tail(), &epsilons[1..], maximize)
            }
        }
    }
}

fn epsilon_dominates(a: &[i64], b: &[i64], epsilons: &[f64], maximize: &[bool]) -> bool {
    a.iter()
        .zip(b.iter())
        .zip(epsilons.iter().zip(maximize.iter()))
        .all(|((&a, &b), (&epsilon, &max))| {
            if max {
                a as f64 >= b as f64 * epsilon
            } else {
                a as f64 * epsilon <= b as f64
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPACITY: i64 = 100;

    fn edge(time: i64, consumption: i64) -> Edge {
        Edge {
            start: 0,
            end: 1,
            time,
            consumption,
        }
    }

    #[test]
    fn edge_extension_from_initial_state() {
        let params = PathParams::initial(CAPACITY).extend(Suffix::Edge(&edge(3, 20)), CAPACITY);
        assert_eq!(params, PathParams::from_values([3, 20, 20, 80]));
    }

    #[test]
    fn recuperation_never_exceeds_capacity() {
        let params = PathParams::initial(CAPACITY).extend(Suffix::Edge(&edge(1, -30)), CAPACITY);
        assert_eq!(params.min_soc_before, 0);
        assert_eq!(params.max_soc_after, CAPACITY);
        assert_eq!(params.consumption, -30);
    }

    #[test]
    fn recuperation_after_spending_recovers_energy() {
        let capacity = CAPACITY;
        let spent = PathParams::initial(capacity).extend(Suffix::Edge(&edge(1, 50)), capacity);
        let recovered = spent.extend(Suffix::Edge(&edge(1, -20)), capacity);
        assert_eq!(recovered, PathParams::from_values([2, 50, 30, 70]));
    }

    #[test]
    fn cover_rule_matches_edge_by_edge_composition() {
        let hops = [edge(2, 10), edge(4, -15), edge(1, 30)];
        let capacity = CAPACITY;

        let mut aggregated = PathParams::initial(capacity);
        for hop in &hops {
            aggregated = aggregated.extend(Suffix::Edge(hop), capacity);
        }
        let cover_edge = CoverEdge::from_parts(vec![0, 1, 2, 3], aggregated);

        let prefix = PathParams::from_values([5, 25, 25, 75]);
        let mut direct = prefix;
        for hop in &hops {
            direct = direct.extend(Suffix::Edge(hop), capacity);
        }
        let via_cover = prefix.extend(Suffix::Cover(&cover_edge), capacity);
        assert_eq!(direct, via_cover);
    }

    #[test]
    fn infeasibility_tracks_soc_window() {
        assert!(!PathParams::initial(CAPACITY).is_infeasible(CAPACITY));
        assert!(PathParams::from_values([0, CAPACITY + 1, 0, 0]).is_infeasible(CAPACITY));
        assert!(PathParams::from_values([0, 0, 0, -1]).is_infeasible(CAPACITY));
    }

    #[test]
    fn time_never_decreases_under_either_rule() {
        let hops = [edge(0, -40), edge(3, 60), edge(0, -90), edge(2, -5), edge(1, 25)];
        let starts = [
            PathParams::initial(CAPACITY),
            PathParams::from_values([7, 40, 40, 60]),
            PathParams::from_values([2, 0, -20, CAPACITY]),
        ];

        for start in starts {
            let mut current = start;
            for hop in &hops {
                let next = current.extend(Suffix::Edge(hop), CAPACITY);
                assert!(next.time >= current.time, "{next:?} after {current:?}");
                current = next;
            }
        }

        let mut aggregated = PathParams::initial(CAPACITY);
        for (index, hop) in hops.iter().enumerate() {
            aggregated = aggregated.extend(Suffix::Edge(hop), CAPACITY);
            let cover_edge = CoverEdge::from_parts((0..=index + 1).collect(), aggregated);
            for start in starts {
                let next = start.extend(Suffix::Cover(&cover_edge), CAPACITY);
                assert!(next.time >= start.time, "{next:?} after {start:?}");
            }
        }
    }

    #[test]
    fn dominance_is_reflexive_and_transitive() {
        let a = PathParams::from_values([1, 1, 1, 9]);
        let b = PathParams::from_values([2, 1, 3, 8]);
        let c = PathParams::from_values([2, 4, 3, 2]);
        assert!(a.dominates(&a));
        assert!(a.dominates(&b));
        assert!(b.dominates(&c));
        assert!(a.dominates(&c));
        assert!(!c.dominates(&a));
    }

    #[test]
    fn maximised_dimension_is_compared_inversely() {
        let more_charge = PathParams::from_values([1, 1, 1, 9]);
        let less_charge = PathParams::from_values([1, 1, 1, 5]);
        assert!(more_charge.dominates(&less_charge));
        assert!(!less_charge.dominates(&more_charge));
        assert_eq!(
            more_charge.cmp_lexicographic(&less_charge),
            Ordering::Less
        );
    }

    #[test]
    fn epsilon_with_unit_coefficients_is_exact() {
        let unit = Dominance::Epsilon([1.0; NUM_PATH_PARAMETERS]);
        let a = PathParams::from_values([3, 1, 4, 10]);
        let b = PathParams::from_values([3, 2, 4, 9]);
        assert_eq!(unit.dominates(&a, &b), Dominance::Exact.dominates(&a, &b));
        assert_eq!(unit.dominates(&b, &a), Dominance::Exact.dominates(&b, &a));
    }

    #[test]
    fn epsilon_dominance_is_looser() {
        let a = PathParams::from_values([105, 10, 10, 90]);
        let b = PathParams::from_values([100, 10, 10, 95]);
        assert!(!Dominance::Exact.dominates(&a, &b));
        assert!(Dominance::Epsilon([0.9; NUM_PATH_PARAMETERS]).dominates(&a, &b));
    }

    #[test]
    fn tail_dominance_ignores_time() {
        let tail = [10, 10, 50];
        let later = PathParams::from_values([1_000, 12, 10, 40]);
        assert!(Dominance::Exact.tail_dominates(&tail, &later));
        let better_charge = PathParams::from_values([0, 10, 10, 60]);
        assert!(!Dominance::Exact.tail_dominates(&tail, &better_charge));
    }
}
