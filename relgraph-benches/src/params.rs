//! Benchmark parameter types.

use std::fmt;

/// Size of a generated graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes.
    pub node_count: u32,
    /// Final edge count.
    pub edge_count: u64,
}

impl GraphBenchParams {
    /// Parameters whose edge count is `density` edges per node.
    #[must_use]
    pub const fn with_density(node_count: u32, density: u64) -> Self {
        Self {
            node_count,
            edge_count: (node_count as u64).saturating_mul(density),
        }
    }
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},m={}", self.node_count, self.edge_count)
    }
}
