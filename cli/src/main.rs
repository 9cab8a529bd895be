//! fieldpath CLI - inspect reflected types and their field key paths.

use clap::Parser;
use fieldpath_cli::cli::{Cli, Command};
use fieldpath_cli::{commands, common};

fn main() {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level, WARN by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "running command");

    let result = match cli.command {
        Command::Demo => commands::demo::run(),
        Command::Fields(args) => commands::fields::run(args),
        Command::Keypaths(args) => commands::keypaths::run(args),
        Command::Types => {
            commands::types::run();
            Ok(())
        }
    };

    if let Err(e) = result {
        common::error::report_and_exit(e);
    }
}
