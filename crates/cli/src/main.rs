// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fdk - fdkeep CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod daemon_process;
mod env;
mod output;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{agent, status, trace};

#[derive(Parser, Debug)]
#[command(
    name = "fdk",
    version,
    about = "fdkeep - keep the backup agent running in the background"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the agent (launches fdkd if needed)
    Start(agent::StartArgs),
    /// Stop the agent and the daemon
    Stop,
    /// Restore the agent after a reboot if it was left running
    Boot,
    /// Show desired state and daemon status
    Status,
    /// Print the tail of the agent trace
    Trace(trace::TraceArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        // No subcommand provided: print help and exit 0
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Start(args) => agent::start(args).await,
        Commands::Stop => agent::stop().await,
        Commands::Boot => agent::boot().await,
        Commands::Status => status::handle(format).await,
        Commands::Trace(args) => trace::handle(args).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
