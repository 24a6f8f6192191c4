//! Support library for the `relgraph` binary.
//!
//! Exposes the command pipeline and logging set-up so doctests and unit tests
//! can drive the generators without spawning a subprocess.

pub mod cli;
pub mod logging;
