use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dense node identifier in `0..node_count`.
pub type NodeId = usize;

/// Dense edge identifier in `0..edge_count`.
pub type EdgeId = usize;

/// Battery capacity used when the caller does not provide one. Units match the
/// edge consumption values of the input graph.
pub const DEFAULT_BATTERY_CAPACITY: i64 = 40_000_000;

/// Largest accepted capacity, edge time or edge consumption magnitude. Path
/// composition adds and subtracts these values, so they stay well inside `i64`.
pub const MAX_MAGNITUDE: i64 = i64::MAX / 4;

/// Graph vertex with planar projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub elevation: f64,
}

impl Node {
    /// Node at the given projected position with zero elevation.
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            elevation: 0.0,
        }
    }

    /// Planar Euclidean distance between two projected positions.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Directed arc carrying travel time and energy consumption.
///
/// Consumption may be negative to model recuperation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(alias = "from")]
    pub start: NodeId,
    #[serde(alias = "to")]
    pub end: NodeId,
    pub time: i64,
    pub consumption: i64,
}

/// Immutable adjacency structure consumed by the cover builder and planners.
///
/// Accessors index directly into dense tables: passing an identifier outside
/// `0..node_count` (or `0..edge_count`) is a caller bug and panics.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    goal_flags: Vec<bool>,
    goals: Vec<NodeId>,
    battery_capacity: i64,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `node` is a valid identifier for this graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        node < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Edges leaving `node`, in insertion order.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[node].iter().map(move |&edge| &self.edges[edge])
    }

    /// Edges entering `node`, in insertion order.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[node].iter().map(move |&edge| &self.edges[edge])
    }

    pub fn is_goal(&self, node: NodeId) -> bool {
        self.goal_flags[node]
    }

    /// Declared goals in declaration order.
    pub fn goals(&self) -> &[NodeId] {
        &self.goals
    }

    /// Global battery capacity bounding `minSoCBefore` and `maxSoCAfter`.
    pub fn battery_capacity(&self) -> i64 {
        self.battery_capacity
    }
}

/// Incremental constructor for [`Graph`]. Validation happens in [`GraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    goals: Vec<NodeId>,
    goal_stride: Option<usize>,
    battery_capacity: i64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            goals: Vec::new(),
            goal_stride: None,
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` nodes at the origin, numbered after the existing ones.
    pub fn with_nodes(mut self, count: usize) -> Self {
        let offset = self.nodes.len();
        self.nodes
            .extend((0..count).map(|index| Node::new(offset + index, 0.0, 0.0)));
        self
    }

    pub fn battery_capacity(mut self, capacity: i64) -> Self {
        self.battery_capacity = capacity;
        self
    }

    /// Mark every `stride`-th node (starting at node 0) as a goal when building.
    pub fn goal_stride(mut self, stride: usize) -> Self {
        self.goal_stride = Some(stride);
        self
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_edge(
        &mut self,
        start: NodeId,
        end: NodeId,
        time: i64,
        consumption: i64,
    ) -> &mut Self {
        self.edges.push(Edge {
            start,
            end,
            time,
            consumption,
        });
        self
    }

    pub fn add_goal(&mut self, node: NodeId) -> &mut Self {
        self.goals.push(node);
        self
    }

    /// Validate the collected data and freeze it into a [`Graph`].
    pub fn build(self) -> Result<Graph> {
        if self.battery_capacity <= 0 || self.battery_capacity > MAX_MAGNITUDE {
            return Err(Error::GraphData {
                message: format!(
                    "battery capacity must be in 1..={}, got {}",
                    MAX_MAGNITUDE, self.battery_capacity
                ),
            });
        }

        let mut nodes = self.nodes;
        nodes.sort_by_key(|node| node.id);
        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(Error::GraphData {
                    message: format!(
                        "node ids must be dense and unique in 0..{}; found {} at position {}",
                        nodes.len(),
                        node.id,
                        index
                    ),
                });
            }
        }

        let node_count = nodes.len();
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.start >= node_count || edge.end >= node_count {
                return Err(Error::GraphData {
                    message: format!(
                        "edge {} ({} -> {}) references a node outside 0..{}",
                        index, edge.start, edge.end, node_count
                    ),
                });
            }
            if edge.time < 0 {
                return Err(Error::GraphData {
                    message: format!("edge {} has negative time {}", index, edge.time),
                });
            }
            if edge.time > MAX_MAGNITUDE
                || edge.consumption.unsigned_abs() > MAX_MAGNITUDE as u64
            {
                return Err(Error::GraphData {
                    message: format!(
                        "edge {} exceeds the supported magnitude {} (time {}, consumption {})",
                        index, MAX_MAGNITUDE, edge.time, edge.consumption
                    ),
                });
            }
            outgoing[edge.start].push(index);
            incoming[edge.end].push(index);
        }

        let mut goal_flags = vec![false; node_count];
        let mut goals = Vec::new();
        let strided = self
            .goal_stride
            .filter(|stride| *stride > 0)
            .map(|stride| (0..node_count).step_by(stride).collect::<Vec<_>>())
            .unwrap_or_default();
        for goal in self.goals.into_iter().chain(strided) {
            if goal >= node_count {
                return Err(Error::UnknownNode {
                    node: goal,
                    node_count,
                });
            }
            if !goal_flags[goal] {
                goal_flags[goal] = true;
                goals.push(goal);
            }
        }

        Ok(Graph {
            nodes,
            edges: self.edges,
            outgoing,
            incoming,
            goal_flags,
            goals,
            battery_capacity: self.battery_capacity,
        })
    }
}
