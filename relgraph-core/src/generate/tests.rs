//! Unit tests for the random graph generators.

use std::collections::HashSet;

use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{
    error::RelgraphError,
    relation::{Graph, NodeId},
};

use super::*;

fn pairs<V, E>(graph: &Graph<V, E>) -> Vec<(NodeId, NodeId)> {
    graph
        .edges()
        .map(|edge| (edge.source(), edge.target()))
        .collect()
}

#[rstest]
#[case(0, 0)]
#[case(1, 0)]
#[case(2, 2)]
#[case(5, 20)]
fn complete_creates_every_ordered_pair(#[case] nodes: u32, #[case] expected: usize) {
    let graph = complete_graph(0..nodes, constant(())).expect("small graph");

    let distinct: HashSet<_> = pairs(&graph).into_iter().collect();
    assert_eq!(graph.edge_count(), expected);
    assert_eq!(distinct.len(), expected);
    assert!(graph.edges().all(|edge| !edge.is_self_loop()));
}

#[test]
fn complete_skips_pairs_that_already_exist() {
    let mut graph = Graph::from_node_values(['a', 'b', 'c']);
    let ids: Vec<_> = graph.node_ids().collect();
    graph.add_edge(ids[0], ids[1], "old").expect("members");
    graph.add_edge(ids[2], ids[2], "loop").expect("members");

    let summary = connect_completely(&mut graph, constant("new")).expect("small graph");

    assert_eq!(summary.edges_created, 5);
    assert_eq!(graph.edge_count(), 7);
    let old: Vec<_> = graph.edges().filter(|edge| *edge.value() == "old").collect();
    assert_eq!(old.len(), 1);
}

#[test]
fn complete_passes_endpoint_values_to_the_value_function() {
    let graph = complete_graph(["x", "y"], |from: &&str, to: &&str| format!("{from}->{to}"))
        .expect("small graph");
    let labels: Vec<_> = graph.edges().map(|edge| edge.value().clone()).collect();
    assert_eq!(labels, ["x->y", "y->x"]);
}

#[test]
fn random_reaches_the_exact_target() {
    let mut rng = SmallRng::seed_from_u64(21);
    let mut graph = Graph::from_node_values(0..6_u8);
    let summary = connect_randomly(&mut graph, 40, constant(()), &mut rng).expect("valid target");

    assert_eq!(graph.edge_count(), 40);
    assert_eq!(summary.edges_created, 40);
    assert_eq!(summary.rejected_draws, 0);
}

#[test]
fn random_can_produce_self_loops_and_parallel_edges() {
    let mut rng = SmallRng::seed_from_u64(4);
    let graph = random_graph(0..2_u8, 64, constant(()), &mut rng).expect("valid target");

    let edges = pairs(&graph);
    let distinct: HashSet<_> = edges.iter().copied().collect();
    assert!(graph.edges().any(|edge| edge.is_self_loop()));
    assert!(distinct.len() < edges.len());
}

#[test]
fn random_with_the_same_seed_is_reproducible() {
    let run = || {
        let mut rng = SmallRng::seed_from_u64(99);
        let graph = random_graph(0..10_u32, 30, constant(()), &mut rng).expect("valid target");
        pairs(&graph)
    };
    assert_eq!(run(), run());
}

#[rstest]
#[case::random(true)]
#[case::preferential(false)]
fn targets_below_the_current_count_are_rejected(#[case] random: bool) {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut graph = complete_graph(0..3_u8, constant(())).expect("small graph");

    let result = if random {
        connect_randomly(&mut graph, 2, constant(()), &mut rng)
    } else {
        connect_preferentially(&mut graph, 2, constant(()), &mut rng)
    };

    assert!(matches!(result, Err(RelgraphError::InvalidArgument { .. })));
    assert_eq!(graph.edge_count(), 6);
}

#[test]
fn edges_on_an_empty_node_set_are_unsatisfiable() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut graph: Graph<u8, ()> = Graph::new();

    let random = connect_randomly(&mut graph, 1, constant(()), &mut rng);
    let preferential = connect_preferentially(&mut graph, 1, constant(()), &mut rng);

    let expected = RelgraphError::Unsatisfiable {
        requested: 1,
        available: 0,
    };
    assert_eq!(random, Err(expected.clone()));
    assert_eq!(preferential, Err(expected));
}

#[test]
fn matching_targets_are_a_no_op() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut graph: Graph<u8, ()> = Graph::new();

    assert_eq!(
        connect_randomly(&mut graph, 0, constant(()), &mut rng),
        Ok(GenerationSummary::default())
    );
    assert_eq!(
        connect_preferentially(&mut graph, 0, constant(()), &mut rng),
        Ok(GenerationSummary::default())
    );
}

#[test]
fn preferential_never_repeats_pairs_or_loops() {
    let mut rng = SmallRng::seed_from_u64(0xBA);
    let graph = preferential_graph(0..8_u32, 40, constant(()), &mut rng).expect("satisfiable");

    let edges = pairs(&graph);
    let distinct: HashSet<_> = edges.iter().copied().collect();
    assert_eq!(graph.edge_count(), 40);
    assert_eq!(distinct.len(), edges.len());
    assert!(edges.iter().all(|(from, to)| from != to));
}

#[test]
fn preferential_can_fill_every_open_pair() {
    let mut rng = SmallRng::seed_from_u64(12);
    let graph = preferential_graph(0..4_u32, 12, constant(()), &mut rng).expect("satisfiable");
    assert_eq!(graph.edge_count(), 12);
}

#[test]
fn preferential_rejects_requests_beyond_the_open_pairs_up_front() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut graph = Graph::from_node_values(0..3_u8);
    let ids: Vec<_> = graph.node_ids().collect();
    graph.add_edge(ids[0], ids[1], ()).expect("members");
    graph.add_edge(ids[0], ids[1], ()).expect("members");

    let err = connect_preferentially(&mut graph, 8, constant(()), &mut rng)
        .expect_err("only five pairs remain open");

    assert_eq!(
        err,
        RelgraphError::Unsatisfiable {
            requested: 8,
            available: 7,
        }
    );
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn preferential_rolls_back_when_the_rejection_limit_trips() {
    let mut rng = SmallRng::seed_from_u64(8);
    let params = GeneratorParams::new().with_max_rejections(1);

    // With two nodes every other draw is a self-loop, so a single allowed
    // rejection trips quickly.
    let (err, graph) = (0..64)
        .find_map(|_| {
            let mut graph = Graph::from_node_values(0..2_u8);
            connect_preferentially_with(&mut graph, 2, constant(()), &mut rng, &params)
                .err()
                .map(|err| (err, graph))
        })
        .expect("a single allowed rejection must eventually trip");

    assert!(matches!(
        err,
        RelgraphError::RejectionLimitExceeded { attempts: 1, .. }
    ));
    assert_eq!(graph, Graph::from_node_values(0..2_u8));
}

#[test]
fn preferential_failure_keeps_the_original_edges() {
    let mut rng = SmallRng::seed_from_u64(31);
    let mut graph = Graph::from_node_values(0..6_u8);
    let ids: Vec<_> = graph.node_ids().collect();
    graph.add_edge(ids[0], ids[1], ()).expect("members");
    graph.add_edge(ids[2], ids[2], ()).expect("members");
    let before = graph.clone();
    let params = GeneratorParams::new().with_max_rejections(1);

    let outcome = connect_preferentially_with(&mut graph, 30, constant(()), &mut rng, &params);

    assert!(matches!(
        outcome,
        Err(RelgraphError::RejectionLimitExceeded { .. })
    ));
    assert_eq!(graph, before);
}

#[rstest]
#[case("complete")]
#[case("random")]
#[case("preferential")]
fn constructors_refuse_oversized_node_lists(#[case] policy: &str) {
    let mut rng = SmallRng::seed_from_u64(1);
    let values = 0..u64::from(u32::MAX);

    let result = match policy {
        "complete" => complete_graph(values, constant(())),
        "random" => random_graph(values, 1, constant(()), &mut rng),
        _ => preferential_graph(values, 1, constant(()), &mut rng),
    };

    assert!(matches!(
        result,
        Err(RelgraphError::CapacityExceeded { what: "node count", .. })
    ));
}

#[test]
fn saturated_nodes_gain_no_new_edges() {
    let mut rng = SmallRng::seed_from_u64(77);
    let mut graph = Graph::from_node_values(0..30_u32);
    let ids: Vec<_> = graph.node_ids().collect();
    let hub = ids[0];
    for &other in &ids[1..] {
        graph.add_edge(hub, other, ()).expect("members");
        graph.add_edge(other, hub, ()).expect("members");
    }
    let degree = |graph: &Graph<u32, ()>| graph.node(hub).map(|node| node.degree());
    assert_eq!(degree(&graph), Some(58));

    let summary =
        connect_preferentially(&mut graph, 58 + 40, constant(()), &mut rng).expect("satisfiable");

    assert_eq!(graph.edge_count(), 98);
    assert_eq!(degree(&graph), Some(58));
    assert!(summary.rejected_draws > 0);
}

#[test]
fn invalid_params_are_rejected_before_mutation() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut graph = Graph::from_node_values(0..4_u8);
    let params = GeneratorParams::new().with_degree_offset(0.0);

    let err = connect_preferentially_with(&mut graph, 3, constant(()), &mut rng, &params)
        .expect_err("zero offset must be rejected");

    assert!(matches!(err, RelgraphError::InvalidArgument { .. }));
    assert_eq!(graph.edge_count(), 0);
    assert!(GraphGenerator::new(params).is_err());
}

#[test]
fn generator_is_deterministic_for_a_seed() {
    let run = |seed| {
        let mut generator =
            GraphGenerator::new(GeneratorParams::new().with_rng_seed(seed)).expect("valid params");
        let mut graph = Graph::from_node_values(0..12_u32);
        generator.random(&mut graph, 10, constant(())).expect("valid target");
        generator.preferential(&mut graph, 30, constant(())).expect("satisfiable");
        pairs(&graph)
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn generators_emit_spans_and_guard_warnings() {
    use relgraph_test_support::tracing::RecordingLayer;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut graph = Graph::from_node_values(0..3_u8);
        connect_completely(&mut graph, constant(())).expect("small graph");
        let _ = connect_preferentially(&mut graph, 7, constant(()), &mut rng);
    });

    assert!(layer.has_span("generate.complete"));
    assert!(layer.has_span("generate.preferential"));
    assert_eq!(layer.events_at(Level::WARN).len(), 1);
}
