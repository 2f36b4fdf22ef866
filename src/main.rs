//! Intent Relay - Entry Point
//!
//! Runs one orchestration per command: discover site capabilities, match
//! the command against the intent rule table, dispatch the matched intents,
//! and print the execution trace and results. With a command argument the
//! binary runs once and exits; without one it drops into a prompt loop.

use clap::Parser;
use intent_relay::core::config::RelayConfig;
use intent_relay::core::error::Result;
use intent_relay::orchestrator::Orchestrator;
use intent_relay::trace::{Summary, TraceKind};

use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "intent-relay", about = "Capability discovery and intent dispatch orchestrator")]
struct Args {
    /// TOML file with the site list; defaults to the built-in sites
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command to orchestrate; omit for an interactive prompt
    command: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intent_relay=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::default(),
    };
    tracing::info!(sites = config.sites.len(), "intent-relay starting");

    let rt = Runtime::new()?;
    let orchestrator = Orchestrator::new(config);

    // One-shot mode
    if !args.command.is_empty() {
        let command = args.command.join(" ");
        let summary = rt.block_on(orchestrator.run(&command));
        print_summary(&summary)?;
        return Ok(());
    }

    // Interactive mode
    println!("=== INTENT RELAY ===");
    println!("Type a command to orchestrate against the configured sites.");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        let summary = rt.block_on(orchestrator.run(input));
        print_summary(&summary)?;
    }

    println!("Goodbye!");
    Ok(())
}

fn print_summary(summary: &Summary) -> Result<()> {
    println!();
    println!("Trace:");
    for entry in &summary.log {
        let tag = match entry.kind {
            TraceKind::Info => "info",
            TraceKind::Action => "action",
            TraceKind::Success => "success",
            TraceKind::Error => "error",
            TraceKind::Warning => "warning",
        };
        println!("  [{:7}] {}", tag, entry.message);
    }

    println!();
    if summary.results.is_empty() {
        println!("No actions dispatched.");
    } else {
        println!("Results:");
        println!("{}", serde_json::to_string_pretty(&summary.results)?);
    }
    println!();
    Ok(())
}
