//! Benchmark support crate for relgraph.
//!
//! Builds seeded graphs and matrices for the Criterion benchmarks covering
//! the generators and the hot conversion paths.

pub mod error;
pub mod fixtures;
pub mod params;
