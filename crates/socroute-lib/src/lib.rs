//! socroute library entry points.
//!
//! This crate loads road graphs annotated with travel time and energy
//! consumption, builds k-path covers over them, and answers battery-constrained
//! Pareto queries from a source to every goal. Higher-level consumers (the CLI,
//! benchmarks) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod cover;
pub mod error;
pub mod graph;
pub mod label;
pub mod loader;
pub mod output;
pub mod params;
pub mod routing;

pub use cover::{build_cover, Cover, CoverEdge, CoverStats};
pub use error::{Error, Result};
pub use graph::{
    Edge, EdgeId, Graph, GraphBuilder, Node, NodeId, DEFAULT_BATTERY_CAPACITY, MAX_MAGNITUDE,
};
pub use label::Label;
pub use loader::{graph_from_readers, load_graph, GraphSources};
pub use output::{pareto_rows, write_csv, write_json, ParetoRow, QuerySummary};
pub use params::{Dominance, PathParams, Suffix, MAXIMIZE, NUM_PATH_PARAMETERS};
pub use routing::{
    plan_pareto, select_planner, ParetoPlanner, ParetoSets, QueryRequest, QueryStats, SearchMode,
    SearchOptions, Skyline, DEFAULT_ELLIPSE_COEFFICIENT,
};
