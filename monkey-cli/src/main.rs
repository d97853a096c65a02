mod repl;
mod runner;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Runs a Monkey script, or starts an interactive session when no script is given.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to run.
    path: Option<PathBuf>,
}

/// Log output goes to stderr so it never mixes with program output.
/// Enable with `RUST_LOG=monkey_eval=trace` and similar.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.path {
        None => {
            tracing::debug!("starting repl");
            repl::start().context("interactive session failed")
        }
        Some(path) => {
            tracing::debug!(path = %path.display(), "running script");
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            runner::execute(&source, &mut std::io::stdout().lock())
                .context("failed to write program output")
        }
    }
}
