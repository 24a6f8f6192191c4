//! Random graph generation.
//!
//! Three edge-placement policies extend an existing [`Graph`] in place:
//!
//! - [`connect_completely`] adds every missing ordered pair of distinct
//!   nodes, never a self-loop.
//! - [`connect_randomly`] draws both endpoints uniformly with replacement and
//!   always places the edge, so parallel edges and self-loops do occur.
//! - [`connect_preferentially`] draws endpoints with probability
//!   proportional to `degree + offset`, rejecting self-loops and pairs that
//!   are already connected.
//!
//! The `*_graph` constructors start from a fresh node list instead.
//! [`GraphGenerator`] bundles a seeded [`SmallRng`] with
//! [`GeneratorParams`] for callers that do not want to manage randomness.

mod complete;
mod params;
mod preferential;
mod uniform;

#[cfg(test)]
mod tests;

use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    error::{RelgraphError, Result},
    relation::Graph,
};

pub use self::{
    complete::{complete_graph, connect_completely},
    params::{DEFAULT_DEGREE_OFFSET, DEFAULT_MAX_REJECTIONS, DEFAULT_RNG_SEED, GeneratorParams},
    preferential::{connect_preferentially, connect_preferentially_with, preferential_graph},
    uniform::{connect_randomly, random_graph},
};

/// Outcome of a single generator run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GenerationSummary {
    /// Edges added to the graph by this run.
    pub edges_created: u64,
    /// Draws discarded because they would have produced a self-loop or a
    /// duplicate pair.
    pub rejected_draws: u64,
}

/// Returns an edge-value function that ignores both endpoints and yields
/// clones of `value`.
///
/// # Examples
/// ```
/// use relgraph_core::generate::{complete_graph, constant};
///
/// let graph = complete_graph(vec!['a', 'b'], constant(1.0))?;
/// assert!(graph.edges().all(|edge| *edge.value() == 1.0));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn constant<V, E: Clone>(value: E) -> impl FnMut(&V, &V) -> E {
    move |_, _| value.clone()
}

/// Checks that `target` does not shrink the graph and returns how many edges
/// are still missing.
fn edges_to_add<V, E>(graph: &Graph<V, E>, target: u64) -> Result<u64> {
    let current = graph.edge_count() as u64;
    target.checked_sub(current).ok_or_else(|| {
        RelgraphError::invalid_argument(format!(
            "target edge count {target} is below the current edge count {current}"
        ))
    })
}

/// Builds the value of a new edge between two existing nodes.
fn edge_value<V, E, F>(
    graph: &Graph<V, E>,
    source: crate::NodeId,
    target: crate::NodeId,
    value_fn: &mut F,
) -> Result<E>
where
    F: FnMut(&V, &V) -> E,
{
    match (graph.node_value(source), graph.node_value(target)) {
        (Some(from), Some(to)) => Ok(value_fn(from, to)),
        _ => Err(RelgraphError::invalid_argument(format!(
            "nodes {source} and {target} must belong to the graph"
        ))),
    }
}

#[cfg(feature = "metrics")]
fn record_summary(policy: &'static str, summary: &GenerationSummary) {
    metrics::counter!("generator_edges_created_total", "policy" => policy)
        .increment(summary.edges_created);
    metrics::counter!("generator_rejections_total", "policy" => policy)
        .increment(summary.rejected_draws);
}

#[cfg(not(feature = "metrics"))]
fn record_summary(_policy: &'static str, _summary: &GenerationSummary) {}

/// Stateful front end that owns a seeded RNG.
///
/// Two generators built from the same parameters produce identical graphs
/// when fed identical calls.
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, generate::{GeneratorParams, GraphGenerator, constant}};
///
/// let mut generator = GraphGenerator::new(GeneratorParams::new().with_rng_seed(9))?;
/// let mut graph = Graph::from_node_values(0..10_u32);
/// let summary = generator.preferential(&mut graph, 20, constant(()))?;
/// assert_eq!(graph.edge_count(), 20);
/// assert_eq!(summary.edges_created, 20);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GraphGenerator {
    params: GeneratorParams,
    rng: SmallRng,
}

impl GraphGenerator {
    /// Creates a generator whose RNG is seeded from `params`.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when `params` fails
    /// [`GeneratorParams::validate`].
    pub fn new(params: GeneratorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            rng: SmallRng::seed_from_u64(params.rng_seed()),
            params,
        })
    }

    /// Returns the parameters this generator was built with.
    #[must_use]
    pub const fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// See [`connect_completely`].
    ///
    /// # Errors
    /// See [`connect_completely`].
    pub fn complete<V, E, F>(&self, graph: &mut Graph<V, E>, value_fn: F) -> Result<GenerationSummary>
    where
        F: FnMut(&V, &V) -> E,
    {
        connect_completely(graph, value_fn)
    }

    /// See [`connect_randomly`].
    ///
    /// # Errors
    /// See [`connect_randomly`].
    pub fn random<V, E, F>(
        &mut self,
        graph: &mut Graph<V, E>,
        target: u64,
        value_fn: F,
    ) -> Result<GenerationSummary>
    where
        F: FnMut(&V, &V) -> E,
    {
        connect_randomly(graph, target, value_fn, &mut self.rng)
    }

    /// See [`connect_preferentially_with`].
    ///
    /// # Errors
    /// See [`connect_preferentially_with`].
    pub fn preferential<V, E, F>(
        &mut self,
        graph: &mut Graph<V, E>,
        target: u64,
        value_fn: F,
    ) -> Result<GenerationSummary>
    where
        F: FnMut(&V, &V) -> E,
    {
        connect_preferentially_with(graph, target, value_fn, &mut self.rng, &self.params)
    }
}
