//! nstest CLI entry point

use clap::Parser;
use nstest::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Structured logging on stderr (stdout carries results), env-based filter defaulting to info
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_log_filter())),
        )
        .try_init();

    nstest::cli::run(cli);
}
