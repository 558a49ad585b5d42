// Accelhub - Application Entry Point
//
// Parses CLI arguments, initializes structured logging, and dispatches to
// the command handler. Key material is never a log field, at any level.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use accelhub::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    // RUST_LOG=accelhub=debug for per-request output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("accelhub=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
