//! The complete-graph policy.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::{
    capacity::{MAX_CARDINALITY, ordered_pair_count, size_hint},
    error::{RelgraphError, Result},
    relation::{Graph, NodeId},
};

use super::{GenerationSummary, edge_value, record_summary};

/// Connects every ordered pair of distinct nodes that is not already
/// connected.
///
/// Self-loops are never created and existing edges are left untouched, so
/// a graph with `n` nodes and no prior edges ends with `n(n-1)` edges.
///
/// # Errors
/// Returns [`RelgraphError::CapacityExceeded`] when `n(n-1)` exceeds the
/// edge-count limit, or when the new edges would push the total past it.
/// The graph keeps only its original edges on error.
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, generate::{connect_completely, constant}};
///
/// let mut graph = Graph::from_node_values(["a", "b", "c"]);
/// let summary = connect_completely(&mut graph, constant(0_u8))?;
/// assert_eq!(summary.edges_created, 6);
/// assert!(graph.edges().all(|edge| !edge.is_self_loop()));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(name = "generate.complete", err, skip_all, fields(nodes = graph.node_count()))]
pub fn connect_completely<V, E, F>(graph: &mut Graph<V, E>, mut value_fn: F) -> Result<GenerationSummary>
where
    F: FnMut(&V, &V) -> E,
{
    let nodes = graph.node_count() as u64;
    let pairs = ordered_pair_count(nodes).unwrap_or(u64::MAX);
    if pairs > MAX_CARDINALITY {
        warn!(nodes, pairs, "complete graph would exceed the edge limit");
        return Err(RelgraphError::CapacityExceeded {
            what: "complete graph edge count",
            requested: pairs,
            limit: MAX_CARDINALITY,
        });
    }

    let mut existing: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(size_hint(graph.edge_count()));
    existing.extend(graph.edges().map(|edge| (edge.source(), edge.target())));

    let start = graph.edge_count();
    let mut summary = GenerationSummary::default();
    for source in graph.node_ids() {
        for target in graph.node_ids() {
            if source == target || existing.contains(&(source, target)) {
                continue;
            }
            let placed = edge_value(graph, source, target, &mut value_fn)
                .and_then(|value| graph.add_edge(source, target, value));
            if let Err(err) = placed {
                graph.truncate_edges(start);
                return Err(err);
            }
            summary.edges_created += 1;
        }
    }

    debug!(
        created = summary.edges_created,
        already_present = existing.len(),
        "complete graph connected"
    );
    record_summary("complete", &summary);
    Ok(summary)
}

/// Builds a graph with one node per value and connects it completely.
///
/// # Errors
/// See [`connect_completely`].
///
/// # Examples
/// ```
/// use relgraph_core::generate::complete_graph;
///
/// let graph = complete_graph(1..=4, |from: &i32, to: &i32| from * 10 + to)?;
/// assert_eq!(graph.edge_count(), 12);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn complete_graph<V, E, I, F>(values: I, value_fn: F) -> Result<Graph<V, E>>
where
    I: IntoIterator<Item = V>,
    F: FnMut(&V, &V) -> E,
{
    let mut graph = Graph::try_from_node_values(values)?;
    connect_completely(&mut graph, value_fn)?;
    Ok(graph)
}
