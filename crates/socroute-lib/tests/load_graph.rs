use std::fs;
use std::path::Path;

use socroute_lib::{
    build_cover, load_graph, plan_pareto, Error, GraphSources, QueryRequest, SearchMode,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn fixture(dir: &Path) -> GraphSources {
    let nodes = write(
        dir,
        "nodes.csv",
        "id,x,y\n0,0,0\n1,1,0\n2,2,0\n3,3,0\n",
    );
    let edges = write(
        dir,
        "edges.csv",
        "start,end,time,consumption\n0,1,10,400\n1,2,12,-150\n2,3,8,300\n0,2,30,200\n",
    );
    GraphSources::new(nodes, edges).with_battery_capacity(1_000)
}

#[test]
fn loads_graph_with_goal_file() {
    let dir = TempDir::new().expect("temp dir");
    let goals = write(dir.path(), "goals.csv", "node\n3\n1\n");
    let graph = load_graph(&fixture(dir.path()).with_goals(goals)).expect("graph loads");

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.goals(), &[3, 1]);
    assert_eq!(graph.battery_capacity(), 1_000);
}

#[test]
fn goal_stride_and_goal_file_combine() {
    let dir = TempDir::new().expect("temp dir");
    let goals = write(dir.path(), "goals.csv", "node\n3\n");
    let sources = fixture(dir.path()).with_goals(goals).with_goal_stride(2);
    let graph = load_graph(&sources).expect("graph loads");
    assert_eq!(graph.goals(), &[3, 0, 2]);
}

#[test]
fn loaded_graph_answers_queries() {
    let dir = TempDir::new().expect("temp dir");
    let goals = write(dir.path(), "goals.csv", "node\n3\n");
    let graph = load_graph(&fixture(dir.path()).with_goals(goals)).expect("graph loads");
    let cover = build_cover(&graph, 3).expect("cover builds");

    let sets = plan_pareto(&graph, Some(&cover), &QueryRequest::new(0, SearchMode::CoverDiscarding))
        .expect("query runs");
    let labels = sets.get(3).expect("goal present");
    let values: Vec<[i64; 4]> = labels.iter().map(|label| label.params.values()).collect();
    assert_eq!(values, vec![[30, 550, 550, 450], [38, 500, 500, 500]]);
}

#[test]
fn malformed_edge_file_names_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let mut sources = fixture(dir.path());
    sources.edges = write(dir.path(), "broken.csv", "start,end,time,consumption\n0,1,x,1\n");

    let error = load_graph(&sources).expect_err("bad edge row");
    assert!(matches!(error, Error::GraphFile { .. }));
    assert!(error.to_string().contains("broken.csv"));
}

#[test]
fn dangling_goal_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let goals = write(dir.path(), "goals.csv", "node\n9\n");
    let error = load_graph(&fixture(dir.path()).with_goals(goals)).expect_err("goal out of range");
    assert!(matches!(error, Error::UnknownNode { node: 9, .. }));
}
