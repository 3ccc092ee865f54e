//! # ksu CLI entry point
//!
//! Parses command-line arguments, initializes tracing and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use ksu_cli::query::{run_query, QueryArgs};
use ksu_cli::resolve_config;

/// Command-line client for the KSU GraphQL API.
///
/// Every request carries the session cookies; a 403 from the server ends the
/// session and exits with status 2.
#[derive(Parser, Debug)]
#[command(name = "ksu", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// GraphQL endpoint. Overrides `KSU_GRAPHQL_URL`.
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<Url>,

    /// Request timeout in seconds. Overrides `KSU_TIMEOUT_SECS`.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a GraphQL query or mutation and print the JSON reply.
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("ksu CLI starting");

    let config = match resolve_config(cli.endpoint.as_ref(), cli.timeout) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Query(args) => run_query(&args, config, &mut stdout).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
