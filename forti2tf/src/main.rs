use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod check_cmd;
mod cli;
mod convert;
mod path_guard;
mod report;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => convert::run_convert(args),
        Command::Check(args) => check_cmd::run_check(args),
    }
}

/// Diagnostics go to stderr. `--verbose` wins over `RUST_LOG`; without
/// either only errors are logged.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("forti2tf=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
