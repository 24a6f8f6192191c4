//! The uniform-random policy.

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::{
    capacity::checked_cardinality,
    error::{RelgraphError, Result},
    relation::{Graph, NodeId},
};

use super::{GenerationSummary, edge_value, edges_to_add, record_summary};

/// Adds edges between uniformly drawn endpoints until the graph holds
/// `target` edges.
///
/// Source and target are drawn independently and with replacement, and the
/// edge is always placed: the result is a multigraph that may contain
/// parallel edges and self-loops.
///
/// # Errors
/// Returns [`RelgraphError::InvalidArgument`] when `target` is below the
/// current edge count, [`RelgraphError::Unsatisfiable`] when edges are
/// requested on a graph without nodes, and
/// [`RelgraphError::CapacityExceeded`] when `target` exceeds the edge-count
/// limit. The graph keeps only its original edges on error.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use relgraph_core::{Graph, generate::{connect_randomly, constant}};
///
/// let mut graph = Graph::from_node_values(0..3_u8);
/// let mut rng = SmallRng::seed_from_u64(5);
/// connect_randomly(&mut graph, 50, constant(()), &mut rng)?;
/// assert_eq!(graph.edge_count(), 50);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(
    name = "generate.random",
    err,
    skip_all,
    fields(nodes = graph.node_count(), edges = graph.edge_count(), requested = target),
)]
pub fn connect_randomly<V, E, F, R>(
    graph: &mut Graph<V, E>,
    target: u64,
    mut value_fn: F,
    rng: &mut R,
) -> Result<GenerationSummary>
where
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    let missing = edges_to_add(graph, target)?;
    checked_cardinality("edge count", target)?;
    let nodes: Vec<NodeId> = graph.node_ids().collect();
    if missing > 0 && nodes.is_empty() {
        warn!(requested = target, "cannot place edges on a graph without nodes");
        return Err(RelgraphError::Unsatisfiable {
            requested: target,
            available: graph.edge_count() as u64,
        });
    }

    let start = graph.edge_count();
    let self_loops = match place(graph, &nodes, missing, &mut value_fn, rng) {
        Ok(self_loops) => self_loops,
        Err(err) => {
            graph.truncate_edges(start);
            return Err(err);
        }
    };

    let summary = GenerationSummary {
        edges_created: missing,
        rejected_draws: 0,
    };
    debug!(created = summary.edges_created, self_loops, "random edges placed");
    record_summary("random", &summary);
    Ok(summary)
}

/// Places `missing` edges and returns how many of them are self-loops.
fn place<V, E, F, R>(
    graph: &mut Graph<V, E>,
    nodes: &[NodeId],
    missing: u64,
    value_fn: &mut F,
    rng: &mut R,
) -> Result<u64>
where
    F: FnMut(&V, &V) -> E,
    R: Rng + ?Sized,
{
    let mut self_loops = 0_u64;
    for _ in 0..missing {
        let (Some(&from), Some(&to)) = (
            nodes.get(rng.gen_range(0..nodes.len())),
            nodes.get(rng.gen_range(0..nodes.len())),
        ) else {
            break;
        };
        let value = edge_value(graph, from, to, value_fn)?;
        graph.add_edge(from, to, value)?;
        if from == to {
            self_loops += 1;
        }
    }
    Ok(self_loops)
}

/// Builds a graph with one node per value and connects it with `target`
/// uniformly random edges.
///
/// # Errors
/// See [`connect_randomly`].
pub fn random_graph<V, E, I, F, R>(
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
    connect_randomly(&mut graph, target, value_fn, rng)?;
    Ok(graph)
}
