//! Entry point for the `relgraph` binary.
//!
//! Parses arguments, runs the requested command and prints its summary to
//! stdout. Failures become a non-zero exit status and an `error!` event that
//! carries the stable error code when the core produced one.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, field};

use relgraph_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let report = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&report, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };

    let source = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
        CliError::Core(source) => Some(source),
        _ => None,
    });
    let code = source.map(|source| field::display(source.code().as_str()));
    let sampler_code = source
        .and_then(|source| source.sampler_code())
        .map(|code| field::display(code.as_str()));

    error!(
        error = %format!("{err:#}"),
        code,
        sampler_code,
        "command execution failed"
    );
    ExitCode::FAILURE
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not available until logging is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
