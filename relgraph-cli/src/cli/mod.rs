//! Argument parsing and command execution for `relgraph`.
//!
//! The only command is `generate`, which grows a graph over the labels
//! `0..N` with one of the three edge-placement policies and reports its
//! shape.

mod commands;

pub use commands::{
    Cli, CliError, Command, GenerateCommand, GenerationReport, Policy, render_summary, run_cli,
};
