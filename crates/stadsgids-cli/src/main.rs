//! Stadsgids CLI - one-shot municipal services assistant commands.
//!
//! Each invocation runs exactly one operation and prints its JSON reply to
//! stdout; logs go to stderr. Deliberately not an interactive loop.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::to_string;
use stadsgids_core::ServiceConfig;
use stadsgids_retrieval::RetrievalService;
use stadsgids_transit::{
    DisruptionReply, ScheduleReply, ScheduleSelector, TransitClient, TransitError,
};
use tracing::warn;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Command-line interface for the stadsgids assistant.
#[derive(Debug, Parser)]
#[command(name = "stadsgids", about = "Municipal services assistant for Gent")]
struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    command: Command,
}

/// One-shot operations.
#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the municipal services knowledge base a question
    Ask {
        /// The question to answer
        query: String,
    },
    /// List current transit disruptions
    Disruptions {
        /// Optional free-text filter
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show upcoming departures for a stop or a line
    Schedule {
        /// Stop identifier (ID or name)
        #[arg(long)]
        stop: Option<String>,
        /// Line identifier
        #[arg(long)]
        line: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = ServiceConfig::from_env();
    run(cli.command, &config).await
}

/// Route logs to stderr so stdout stays pure JSON.
fn init_tracing() {
    Registry::default()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stadsgids=info,stadsgids_retrieval=info".into()),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
}

async fn run(command: Command, config: &ServiceConfig) -> Result<ExitCode> {
    match command {
        Command::Ask { query } => {
            let service = RetrievalService::new(&config.retrieval);
            let reply = service.answer(&query).await;
            print_reply(&to_string(&reply)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Disruptions { filter } => {
            let result = match TransitClient::new(&config.transit) {
                Ok(client) => client.disruptions(filter.as_deref()).await,
                Err(config_error) => Err(config_error),
            };
            let exit = exit_for(&result);
            print_reply(&to_string(&DisruptionReply::from(result))?);
            Ok(exit)
        }
        Command::Schedule { stop, line } => {
            let result = match ScheduleSelector::from_parts(stop, line) {
                Ok(selector) => match TransitClient::new(&config.transit) {
                    Ok(client) => client.schedule(&selector).await,
                    Err(config_error) => Err(config_error),
                },
                Err(selector_error) => Err(selector_error),
            };
            let exit = exit_for(&result);
            print_reply(&to_string(&ScheduleReply::from(result))?);
            Ok(exit)
        }
    }
}

/// Non-zero exit for transit failures, with the status code in the log.
fn exit_for<T>(result: &Result<T, TransitError>) -> ExitCode {
    match result {
        Err(proxy_error) => {
            warn!(
                "Transit lookup failed with status {}: {proxy_error}",
                proxy_error.status_code()
            );
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn print_reply(reply: &str) {
    // JSON replies go to stdout by convention for CLI tools
    #[allow(clippy::print_stdout, reason = "Reply output")]
    {
        println!("{reply}");
    }
}
