/// nasa-query entry point: free text in, labeled JSON out
mod cli;
mod clients;
mod config;
mod domain;
mod errors;
mod formatter;
mod parser;
mod services;
#[cfg(test)]
mod testutils;
mod utils;

use crate::cli::Cli;
use crate::clients::{NasaClient, SpaceDataApi};
use crate::config::AppConfig;
use crate::services::QueryService;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (.env included) before the log filter is read
    let config = AppConfig::from_env();

    // Initialize logging; stdout is reserved for the JSON document
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let query = cli::read_query(&cli.query, cli.stdio).context("failed to read standard input")?;

    let timeout_secs = cli.timeout_secs.unwrap_or(config.timeout_secs);
    let client = NasaClient::new(&config.nasa_api_url, timeout_secs)
        .context("failed to build HTTP client")?;
    info!("Querying {} (timeout {}s)", config.nasa_api_url, timeout_secs);

    run(
        &cli,
        &config,
        &query,
        Local::now().date_naive(),
        client,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await
}

/// Answer one query: usage, result or error JSON on `out`, diagnostics on `err`
async fn run<A: SpaceDataApi>(
    cli: &Cli,
    config: &AppConfig,
    query: &str,
    today: NaiveDate,
    api: A,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()> {
    if query.is_empty() {
        writeln!(out, "{}", cli::USAGE)?;
        return Ok(());
    }

    let service = QueryService::new(api);
    let api_key = config.resolve_api_key(cli.api_key.as_deref());

    let outcome = service
        .handle(
            query,
            api_key.as_ref().map(|key| key.value.as_str()),
            cli.date.as_deref(),
            today,
        )
        .await;

    // Handled failures still print a JSON document and exit 0
    let output = match outcome {
        Ok(outcome) => {
            if let Some(preview) = &outcome.preview {
                writeln!(err, "{}", preview)?;
            }
            formatter::render(&outcome.payload)?
        }
        Err(e) => {
            writeln!(err, "错误: {}", e)?;
            formatter::render(&e.to_payload())?
        }
    };
    writeln!(out, "{}", output)?;

    Ok(())
}
