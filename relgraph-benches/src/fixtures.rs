//! Seeded inputs shared by the benchmarks.
//!
//! Every fixture is derived from a fixed seed so repeated runs measure the
//! same graphs.

use rand::{SeedableRng, rngs::SmallRng};
use relgraph_core::{
    Graph, IdentityMapping, SparseMatrix, convert,
    generate::{constant, random_graph},
};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Seed used for every fixture.
pub const SEED: u64 = 42;

/// Uniform-random multigraph over the labels `0..node_count` with unit
/// weights.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `params` asks for edges on an
/// empty node set and [`BenchSetupError::Relgraph`] when generation fails.
pub fn weighted_graph(params: GraphBenchParams) -> Result<Graph<u64, f64>, BenchSetupError> {
    if params.node_count == 0 && params.edge_count > 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "node_count",
        });
    }
    let mut rng = SmallRng::seed_from_u64(SEED);
    let graph = random_graph(
        0..u64::from(params.node_count),
        params.edge_count,
        constant(1.0),
        &mut rng,
    )?;
    Ok(graph)
}

/// The sparse matrix view of [`weighted_graph`].
///
/// # Errors
/// See [`weighted_graph`].
pub fn weighted_matrix(params: GraphBenchParams) -> Result<SparseMatrix<f64>, BenchSetupError> {
    let graph = weighted_graph(params)?;
    let mapping = IdentityMapping::new(u64::from(params.node_count));
    Ok(convert::to_sparse_matrix(&graph, &mapping)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(GraphBenchParams::with_density(10, 3), 30)]
    #[case(GraphBenchParams::with_density(1, 4), 4)]
    fn weighted_graph_has_the_requested_size(
        #[case] params: GraphBenchParams,
        #[case] expected: usize,
    ) {
        let graph = weighted_graph(params).expect("fixture must build");
        assert_eq!(graph.edge_count(), expected);
    }

    #[test]
    fn edges_without_nodes_are_rejected() {
        let params = GraphBenchParams {
            node_count: 0,
            edge_count: 1,
        };
        assert!(matches!(
            weighted_graph(params),
            Err(BenchSetupError::ZeroValue { .. })
        ));
    }

    #[test]
    fn weighted_matrix_is_square() {
        let params = GraphBenchParams::with_density(16, 2);
        let matrix = weighted_matrix(params).expect("fixture must build");
        assert!(matrix.cardinality() <= 32);
        assert_eq!(matrix.rows(), 16);
    }
}
