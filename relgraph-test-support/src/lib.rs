//! Shared test utilities used across relgraph crates.

pub mod profile;
pub mod tracing;
