//! Per-node discarding skyline used by the discarding planners.
//!
//! Labels are closed in lexicographic order, so every label closed at a node
//! arrived no later than any label still to come. Comparing only the tail of
//! the vector (everything but time) against the closed labels therefore
//! decides full dominance, and only the non-dominated tails need keeping.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::params::{Dominance, PathParams, NUM_PATH_PARAMETERS};

type Tail = [i64; NUM_PATH_PARAMETERS - 1];

/// Ordered key of a tail vector: `minSoCBefore` and `consumption` ascending,
/// `maxSoCAfter` descending.
type TailKey = (i64, i64, Reverse<i64>);

fn key(tail: &Tail) -> TailKey {
    (tail[0], tail[1], Reverse(tail[2]))
}

fn tail_of(key: &TailKey) -> Tail {
    [key.0, key.1, key.2 .0]
}

/// Minimal set of mutually non-dominated tail vectors.
#[derive(Debug, Clone, Default)]
pub struct Skyline {
    tails: BTreeSet<TailKey>,
}

impl Skyline {
    pub fn len(&self) -> usize {
        self.tails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tails.is_empty()
    }

    /// Fold the tail of a newly closed label into the skyline.
    pub fn insert(&mut self, params: &PathParams) {
        let tail = params.tail();
        let new_key = key(&tail);
        if self
            .tails
            .range(..=new_key)
            .any(|existing| Dominance::Exact.tail_dominates(&tail_of(existing), params))
        {
            return;
        }

        // Only keys ordered after the new one can be dominated by it.
        let dominated: Vec<TailKey> = self
            .tails
            .range(new_key..)
            .copied()
            .filter(|existing| tail_dominates_tail(&tail, &tail_of(existing)))
            .collect();
        for existing in dominated {
            self.tails.remove(&existing);
        }
        self.tails.insert(new_key);
    }

    /// Whether any skyline tail dominates the tail of `params`.
    pub fn discards(&self, params: &PathParams, dominance: &Dominance) -> bool {
        self.tails
            .iter()
            .any(|existing| dominance.tail_dominates(&tail_of(existing), params))
    }

    pub fn tails(&self) -> impl Iterator<Item = Tail> + '_ {
        self.tails.iter().map(tail_of)
    }
}

fn tail_dominates_tail(a: &Tail, b: &Tail) -> bool {
    a[0] <= b[0] && a[1] <= b[1] && a[2] >= b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tail: Tail) -> PathParams {
        PathParams::from_values([0, tail[0], tail[1], tail[2]])
    }

    #[test]
    fn insert_removes_dominated_tails() {
        let mut skyline = Skyline::default();
        skyline.insert(&params([10, 10, 50]));
        skyline.insert(&params([5, 20, 60]));
        assert_eq!(skyline.len(), 2);

        skyline.insert(&params([5, 5, 70]));
        assert_eq!(skyline.tails().collect::<Vec<_>>(), vec![[5, 5, 70]]);
    }

    #[test]
    fn dominated_insert_is_ignored() {
        let mut skyline = Skyline::default();
        skyline.insert(&params([5, 5, 70]));
        skyline.insert(&params([6, 5, 70]));
        skyline.insert(&params([5, 5, 70]));
        assert_eq!(skyline.len(), 1);
    }

    #[test]
    fn discards_only_dominated_tails() {
        let mut skyline = Skyline::default();
        skyline.insert(&params([10, 10, 50]));

        let exact = Dominance::Exact;
        assert!(skyline.discards(&PathParams::from_values([99, 10, 12, 50]), &exact));
        assert!(!skyline.discards(&PathParams::from_values([99, 9, 12, 50]), &exact));
        assert!(!skyline.discards(&PathParams::from_values([99, 10, 10, 51]), &exact));
    }

    #[test]
    fn empty_skyline_discards_nothing() {
        let skyline = Skyline::default();
        assert!(skyline.is_empty());
        assert!(!skyline.discards(&PathParams::initial(100), &Dominance::Exact));
    }
}
