//! Benchmark setup error type.

use relgraph_core::RelgraphError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Building or converting a fixture failed.
    #[error("relgraph operation failed: {0}")]
    Relgraph(#[from] RelgraphError),
    /// A zero value was passed where a non-zero count was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// The parameter that was unexpectedly zero.
        context: &'static str,
    },
}
