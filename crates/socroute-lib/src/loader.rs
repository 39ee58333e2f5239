//! CSV graph loading.
//!
//! A graph is described by up to three headed CSV files:
//!
//! - nodes: `id,x,y[,elevation]` with dense ids `0..N`
//! - edges: `start,end,time,consumption` (`from`/`to` are accepted as well)
//! - goals: `node`, one goal per row
//!
//! Goals can alternatively (or additionally) be declared by a stride that
//! marks every n-th node.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, GraphBuilder, Node, NodeId, DEFAULT_BATTERY_CAPACITY};

/// File locations and graph-wide settings for [`load_graph`].
#[derive(Debug, Clone)]
pub struct GraphSources {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub goals: Option<PathBuf>,
    pub goal_stride: Option<usize>,
    pub battery_capacity: i64,
}

impl GraphSources {
    pub fn new(nodes: impl Into<PathBuf>, edges: impl Into<PathBuf>) -> Self {
        Self {
            nodes: nodes.into(),
            edges: edges.into(),
            goals: None,
            goal_stride: None,
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
        }
    }

    pub fn with_goals(mut self, goals: impl Into<PathBuf>) -> Self {
        self.goals = Some(goals.into());
        self
    }

    pub fn with_goal_stride(mut self, stride: usize) -> Self {
        self.goal_stride = Some(stride);
        self
    }

    pub fn with_battery_capacity(mut self, capacity: i64) -> Self {
        self.battery_capacity = capacity;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GoalRecord {
    node: NodeId,
}

/// Load and validate a graph from CSV files.
pub fn load_graph(sources: &GraphSources) -> Result<Graph> {
    debug!(
        nodes = %sources.nodes.display(),
        edges = %sources.edges.display(),
        "loading graph"
    );

    let mut builder = GraphBuilder::new().battery_capacity(sources.battery_capacity);
    if let Some(stride) = sources.goal_stride {
        builder = builder.goal_stride(stride);
    }

    let nodes = open(&sources.nodes)?;
    let edges = open(&sources.edges)?;
    let goals = sources.goals.as_deref().map(open).transpose()?;
    read_into(&mut builder, nodes, edges, goals)?;

    let graph = builder.build()?;
    debug!(
        node_count = graph.node_count(),
        edge_count = graph.edge_count(),
        goal_count = graph.goals().len(),
        "loaded graph"
    );
    Ok(graph)
}

/// Build a graph from in-memory CSV readers; see the module docs for the layout.
pub fn graph_from_readers<R: Read>(
    nodes: R,
    edges: R,
    goals: Option<R>,
    battery_capacity: i64,
) -> Result<Graph> {
    let mut builder = GraphBuilder::new().battery_capacity(battery_capacity);
    read_into(
        &mut builder,
        Input::unnamed(nodes),
        Input::unnamed(edges),
        goals.map(Input::unnamed),
    )?;
    builder.build()
}

/// CSV source, optionally named by the file it was opened from.
struct Input<'a, R> {
    reader: R,
    path: Option<&'a Path>,
}

impl<R: Read> Input<'_, R> {
    fn unnamed(reader: R) -> Self {
        Self { reader, path: None }
    }

    fn records<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let path = self.path;
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(self.reader);
        let mut rows = Vec::new();
        for row in csv_reader.deserialize() {
            rows.push(row.map_err(|err| match path {
                Some(path) => Error::GraphFile {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                },
                None => Error::Csv(err),
            })?);
        }
        Ok(rows)
    }
}

fn open(path: &Path) -> Result<Input<'_, fs::File>> {
    let file = fs::File::open(path).map_err(|err| Error::GraphFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(Input {
        reader: file,
        path: Some(path),
    })
}

fn read_into<R: Read>(
    builder: &mut GraphBuilder,
    nodes: Input<'_, R>,
    edges: Input<'_, R>,
    goals: Option<Input<'_, R>>,
) -> Result<()> {
    for node in nodes.records::<Node>()? {
        builder.add_node(node);
    }
    for edge in edges.records::<Edge>()? {
        builder.add_edge(edge.start, edge.end, edge.time, edge.consumption);
    }
    if let Some(goals) = goals {
        for goal in goals.records::<GoalRecord>()? {
            builder.add_goal(goal.node);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const NODES: &str = "id,x,y,elevation\n0,0.0,0.0,310\n1,1.5,0.0,305\n2,3.0,1.0,290\n";
    const EDGES: &str = "from,to,time,consumption\n0,1,60,1200\n1,2,45,-300\n";

    #[test]
    fn reads_nodes_edges_and_goals() {
        let graph = graph_from_readers(
            Cursor::new(NODES),
            Cursor::new(EDGES),
            Some(Cursor::new("node\n2\n")),
            10_000,
        )
        .expect("graph loads");

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node(0).elevation, 310.0);
        assert_eq!(graph.goals(), &[2]);
        assert_eq!(graph.battery_capacity(), 10_000);
        let edge = graph.outgoing_edges(1).next().expect("edge 1 -> 2");
        assert_eq!((edge.end, edge.time, edge.consumption), (2, 45, -300));
    }

    #[test]
    fn elevation_column_is_optional() {
        let graph = graph_from_readers(
            Cursor::new("id,x,y\n0,1,2\n"),
            Cursor::new("start,end,time,consumption\n"),
            None,
            DEFAULT_BATTERY_CAPACITY,
        )
        .expect("graph loads");
        assert_eq!(graph.node(0).elevation, 0.0);
    }

    #[test]
    fn malformed_rows_are_reported() {
        let error = graph_from_readers(
            Cursor::new(NODES),
            Cursor::new("from,to,time,consumption\n0,1,fast,3\n"),
            None,
            DEFAULT_BATTERY_CAPACITY,
        )
        .expect_err("time is not numeric");
        assert!(matches!(error, Error::Csv(_)));
    }

    #[test]
    fn missing_files_name_the_path() {
        let sources = GraphSources::new("/nonexistent/nodes.csv", "/nonexistent/edges.csv");
        let error = load_graph(&sources).expect_err("missing file");
        assert!(format!("{error}").contains("/nonexistent/nodes.csv"));
    }
}
