//! Common test utilities and fixture builders.
//!
//! Grid graphs are generated deterministically so that every integration test
//! sees the same topology and edge weights.

use socroute_lib::{Graph, GraphBuilder, Label, Node, NodeId, ParetoSets};

/// Edge layout of a generated grid.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    /// Edges in both directions between horizontal and vertical neighbours.
    Bidirectional,
    /// Edges only to the right and downwards; consumption may be negative.
    Recuperating,
}

#[allow(dead_code)]
/// Build a `width` x `height` grid with every `goal_stride`-th node as a goal.
pub fn grid(width: usize, height: usize, kind: GridKind, capacity: i64, goal_stride: usize) -> Graph {
    let mut builder = GraphBuilder::new().battery_capacity(capacity).goal_stride(goal_stride);
    for y in 0..height {
        for x in 0..width {
            builder.add_node(Node::new(y * width + x, x as f64, y as f64));
        }
    }

    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            let mut neighbours = Vec::new();
            if x + 1 < width {
                neighbours.push((id + 1, 0));
            }
            if y + 1 < height {
                neighbours.push((id + width, 1));
            }
            if kind == GridKind::Bidirectional {
                if x > 0 {
                    neighbours.push((id - 1, 2));
                }
                if y > 0 {
                    neighbours.push((id - width, 3));
                }
            }
            for (next, direction) in neighbours {
                let (time, consumption) = weights(x, y, direction, kind);
                builder.add_edge(id, next, time, consumption);
            }
        }
    }

    builder.build().expect("grid is a valid graph")
}

fn weights(x: usize, y: usize, direction: usize, kind: GridKind) -> (i64, i64) {
    let time = ((x * 3 + y * 5 + direction * 2) % 7) as i64 + 1;
    let base = ((x * 7 + y * 13 + direction * 5) % 11) as i64;
    let consumption = match kind {
        GridKind::Bidirectional => base + 1,
        GridKind::Recuperating => base - 4,
    };
    (time, consumption)
}

/// Chain `0 -> 1 -> ... -> len-1` with unit time and zero consumption.
#[allow(dead_code)]
pub fn chain(len: usize, goals: &[NodeId]) -> Graph {
    let mut builder = GraphBuilder::new().with_nodes(len);
    for node in 1..len {
        builder.add_edge(node - 1, node, 1, 0);
    }
    for &goal in goals {
        builder.add_goal(goal);
    }
    builder.build().expect("chain is a valid graph")
}

#[allow(dead_code)]
/// Parameter vectors of every goal, sorted, for comparing results across modes.
pub fn signature(sets: &ParetoSets) -> Vec<(NodeId, Vec<[i64; 4]>)> {
    sets.iter()
        .map(|(goal, labels)| {
            let mut values: Vec<[i64; 4]> = labels.iter().map(|label| label.params.values()).collect();
            values.sort();
            (goal, values)
        })
        .collect()
}

/// Whether no label of the slice dominates another one.
#[allow(dead_code)]
pub fn is_antichain(labels: &[Label]) -> bool {
    labels.iter().enumerate().all(|(i, a)| {
        labels
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !a.params.dominates(&b.params))
    })
}
