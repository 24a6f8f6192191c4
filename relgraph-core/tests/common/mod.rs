use std::collections::HashMap;

use relgraph_core::{Graph, Relation};

/// Multiset of `(source value, target value, edge value)` triples.
#[must_use]
pub fn triple_counts<R>(source: &R) -> HashMap<(R::Key, R::Key, R::Value), usize>
where
    R: Relation,
    R::Key: Clone + Eq + std::hash::Hash,
    R::Value: Clone + Eq + std::hash::Hash,
{
    let mut counts = HashMap::new();
    source.visit_cells(|row, column, value| {
        *counts
            .entry((row.clone(), column.clone(), value.clone()))
            .or_insert(0) += 1;
    });
    counts
}

/// Builds a graph over `nodes` labelled values with the given index edges.
#[must_use]
pub fn graph_from_edges(nodes: u32, edges: &[(u32, u32, i32)]) -> Graph<u32, i32> {
    let mut graph = Graph::from_node_values(0..nodes);
    let ids: Vec<_> = graph.node_ids().collect();
    for &(source, target, value) in edges {
        graph
            .add_edge(ids[source as usize], ids[target as usize], value)
            .expect("edge endpoints must be members");
    }
    graph
}

/// Proptest configuration honouring the shared run profile.
#[must_use]
pub fn proptest_config(default_cases: u32) -> proptest::test_runner::Config {
    let profile = relgraph_test_support::profile::ProptestRunProfile::load(default_cases, false);
    proptest::test_runner::Config {
        cases: profile.cases(),
        fork: profile.fork(),
        ..proptest::test_runner::Config::default()
    }
}
