//! The degree-preferential (Barabási–Albert style) policy.
//!
//! Every node starts with weight `degree + offset`, so degree-zero nodes
//! stay reachable. Endpoints are drawn independently from a
//! [`WeightedSampler`]; a draw that would produce a self-loop or repeat an
//! existing pair is rejected and redrawn. Accepted edges set both endpoint
//! weights to their new degree before the next draw.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::{
    capacity::{checked_cardinality, ordered_pair_count, size_hint},
    error::{RelgraphError, Result},
    relation::{Graph, Node, NodeId},
    sampler::WeightedSampler,
};

use super::{GenerationSummary, GeneratorParams, edge_value, edges_to_add, record_summary};

fn attachment_weight<V, E>(graph: &Graph<V, E>, node: NodeId, offset: f64) -> f64 {
    let degree = graph.node(node).map_or(0, Node::degree);
    degree as f64 + offset
}

/// Distinct non-self `(source, target)` pairs already present in `graph`.
fn existing_pairs<V, E>(graph: &Graph<V, E>) -> HashSet<(NodeId, NodeId)> {
    let mut pairs = HashSet::with_capacity(size_hint(graph.edge_count()));
    pairs.extend(
        graph
            .edges()
            .filter(|edge| !edge.is_self_loop())
            .map(|edge| (edge.source(), edge.target())),
    );
    pairs
}

/// Grows `graph` to `target` edges by preferential attachment using the
/// default [`GeneratorParams`].
///
/// # Errors
/// See [`connect_preferentially_with`].
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use relgraph_core::{Graph, generate::{connect_preferentially, constant}};
///
/// let mut graph = Graph::from_node_values(["a", "b", "c", "d"]);
/// let mut rng = SmallRng::seed_from_u64(17);
/// connect_preferentially(&mut graph, 8, constant(1.0), &mut rng)?;
/// assert_eq!(graph.edge_count(), 8);
/// assert!(graph.edges().all(|edge| !edge.is_self_loop()));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn connect_preferentially<V, E, F, R>(
    graph: &mut Graph<V, E>,
    target: u64,
    value_fn: F,
    rng: &mut R,
) -> Result<GenerationSummary>
where
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    connect_preferentially_with(graph, target, value_fn, rng, &GeneratorParams::default())
}

/// Grows `graph` to `target` edges by preferential attachment.
///
/// New edges never form self-loops and never repeat a `(source, target)`
/// pair already present. Parallel edges or self-loops that existed before
/// the call are kept.
///
/// # Errors
/// - [`RelgraphError::InvalidArgument`] when `params` is invalid or
///   `target` is below the current edge count.
/// - [`RelgraphError::Unsatisfiable`] when fewer than `target - edge_count`
///   unconnected ordered pairs of distinct nodes remain. Checked before any
///   edge is added.
/// - [`RelgraphError::CapacityExceeded`] when `target` exceeds the
///   edge-count limit.
/// - [`RelgraphError::RejectionLimitExceeded`] after
///   [`GeneratorParams::max_rejections`] consecutive rejected draws.
///
/// On any error the graph is left with the edges it had on entry.
#[instrument(
    name = "generate.preferential",
    err,
    skip_all,
    fields(nodes = graph.node_count(), edges = graph.edge_count(), requested = target),
)]
pub fn connect_preferentially_with<V, E, F, R>(
    graph: &mut Graph<V, E>,
    target: u64,
    mut value_fn: F,
    rng: &mut R,
    params: &GeneratorParams,
) -> Result<GenerationSummary>
where
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    params.validate()?;
    let missing = edges_to_add(graph, target)?;
    let mut summary = GenerationSummary::default();
    if missing == 0 {
        return Ok(summary);
    }
    checked_cardinality("edge count", target)?;

    let mut existing = existing_pairs(graph);
    let current = graph.edge_count() as u64;
    let open_pairs = ordered_pair_count(graph.node_count() as u64)
        .unwrap_or(u64::MAX)
        .saturating_sub(existing.len() as u64);
    if missing > open_pairs {
        warn!(requested = target, open_pairs, "not enough unconnected pairs remain");
        return Err(RelgraphError::Unsatisfiable {
            requested: target,
            available: current.saturating_add(open_pairs),
        });
    }

    let start = graph.edge_count();
    match attach(graph, missing, &mut value_fn, rng, params, &mut existing, &mut summary) {
        Ok(()) => {
            debug!(
                created = summary.edges_created,
                rejected = summary.rejected_draws,
                "preferential edges placed"
            );
            record_summary("preferential", &summary);
            Ok(summary)
        }
        Err(err) => {
            graph.truncate_edges(start);
            record_summary("preferential", &summary);
            Err(err)
        }
    }
}

/// Weight of a node after it gained an edge: its plain degree.
fn attached_weight<V, E>(graph: &Graph<V, E>, node: NodeId) -> f64 {
    graph.node(node).map_or(0, Node::degree) as f64
}

fn attach<V, E, F, R>(
    graph: &mut Graph<V, E>,
    missing: u64,
    value_fn: &mut F,
    rng: &mut R,
    params: &GeneratorParams,
    existing: &mut HashSet<(NodeId, NodeId)>,
    summary: &mut GenerationSummary,
) -> Result<()>
where
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    let offset = params.degree_offset();
    let mut sampler = WeightedSampler::with_capacity(graph.node_count());
    for node in graph.node_ids() {
        sampler.put(node, attachment_weight(graph, node, offset))?;
    }

    let mut consecutive = 0_u64;
    while summary.edges_created < missing {
        let from = *sampler.sample(rng)?;
        let to = *sampler.sample(rng)?;
        if from == to || existing.contains(&(from, to)) {
            summary.rejected_draws += 1;
            consecutive += 1;
            if consecutive >= params.max_rejections() {
                warn!(
                    attempts = consecutive,
                    created = summary.edges_created,
                    "preferential attachment gave up"
                );
                return Err(RelgraphError::RejectionLimitExceeded {
                    attempts: consecutive,
                    created: summary.edges_created,
                });
            }
            continue;
        }

        let value = edge_value(graph, from, to, value_fn)?;
        graph.add_edge(from, to, value)?;
        existing.insert((from, to));
        summary.edges_created += 1;
        consecutive = 0;
        sampler.put(from, attached_weight(graph, from))?;
        sampler.put(to, attached_weight(graph, to))?;
    }
    Ok(())
}

/// Builds a graph with one node per value and grows it to `target` edges by
/// preferential attachment with the default parameters.
///
/// # Errors
/// See [`connect_preferentially_with`].
pub fn preferential_graph<V, E, I, F, R>(
    values: I,
    target: u64,
    value_fn: F,
    rng: &mut R,
) -> Result<Graph<V, E>>
where
    I: IntoIterator<Item = V>,
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    let mut graph = Graph::try_from_node_values(values)?;
    connect_preferentially(&mut graph, target, value_fn, rng)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_carry_the_offset_only_until_a_node_gains_an_edge() {
        let mut graph: Graph<char, ()> = Graph::from_node_values(['a', 'b']);
        let ids: Vec<_> = graph.node_ids().collect();
        assert_eq!(attachment_weight(&graph, ids[0], 0.25), 0.25);

        graph.add_edge(ids[0], ids[1], ()).expect("members");
        graph.add_edge(ids[0], ids[1], ()).expect("members");

        assert_eq!(attached_weight(&graph, ids[0]), 2.0);
        assert_eq!(attached_weight(&graph, ids[1]), 2.0);
        assert_eq!(attachment_weight(&graph, ids[1], 0.25), 2.25);
    }
}
