//! filestorage CLI entry point.
//!
//! Binary name: `fstore`
//!
//! Parses CLI arguments, sets up tracing, loads the storage configuration and
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use filestorage_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet)
        .with_json(cli.log_json)
        .with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(cli).await;

    shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(shell, &mut cmd, "fstore", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.data_dir).await;
    cli::run(cli.command, &state, cli.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completions_dispatch_succeeds() {
        let cli = Cli::try_parse_from(["fstore", "completions", "bash"]).unwrap();
        dispatch(cli).await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_surfaces_command_errors() {
        let cli = Cli::try_parse_from(["fstore", "--data-dir", "/nonexistent", "validate", "rel"])
            .unwrap();
        assert!(dispatch(cli).await.is_err());
    }
}
