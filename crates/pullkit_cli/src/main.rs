//! Pullkit CLI
//!
//! Replays scripted layout ticks through a refresh coordinator:
//!
//! ```text
//! pullkit replay scenarios/pull.toml
//! pullkit replay scenarios/pull.toml --json --store times.json
//! pullkit check scenarios/pull.toml
//! ```

mod replay;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pullkit_store::FileStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use replay::{format_record, Replay, ReplayConfig, ReplaySummary, StepRecord};
use scenario::Scenario;

/// Replay and check pull-to-refresh scenarios
#[derive(Parser, Debug)]
#[command(name = "pullkit")]
#[command(about = "Replay and check pull-to-refresh scenarios")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario and print every step
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Persist the header's last-updated time in this file
        #[arg(long)]
        store: Option<PathBuf>,

        /// Virtual milliseconds per tick
        #[arg(long, default_value = "16")]
        frame_ms: u64,
    },

    /// Run a scenario and fail if any expectation is not met
    Check {
        /// Scenario file
        scenario: PathBuf,

        /// Virtual milliseconds per tick
        #[arg(long, default_value = "16")]
        frame_ms: u64,
    },
}

#[derive(serde::Serialize)]
struct ReplayOutput<'a> {
    scenario: &'a str,
    steps: &'a [StepRecord],
    summary: &'a ReplaySummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Replay {
            scenario,
            json,
            store,
            frame_ms,
        } => cmd_replay(&scenario, json, store.as_deref(), frame_ms),
        Command::Check { scenario, frame_ms } => cmd_check(&scenario, frame_ms),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(
    scenario: &Scenario,
    config: ReplayConfig,
    store: Option<&Path>,
) -> Result<(Vec<StepRecord>, ReplaySummary)> {
    let mut replay = match store {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            Replay::with_store(scenario, config, store)
        }
        None => Replay::new(scenario, config),
    };
    let records = replay.run(scenario);
    Ok((records, replay.summary()))
}

fn cmd_replay(path: &Path, json: bool, store: Option<&Path>, frame_ms: u64) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let name = scenario.display_name(path);
    tracing::info!(scenario = name, steps = scenario.steps.len(), "replaying");

    let config = ReplayConfig::default().with_frame_ms(frame_ms);
    let (records, summary) = run(&scenario, config, store)?;

    if json {
        let output = ReplayOutput {
            scenario: name,
            steps: &records,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{name}");
    for record in &records {
        println!("{}", format_record(record));
    }
    print_summary(&summary);
    Ok(())
}

fn cmd_check(path: &Path, frame_ms: u64) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let name = scenario.display_name(path);

    let config = ReplayConfig::default().with_frame_ms(frame_ms);
    let (records, summary) = run(&scenario, config, None)?;

    let failed: Vec<_> = records.iter().filter(|r| !r.mismatches.is_empty()).collect();
    if !failed.is_empty() {
        for record in &failed {
            eprintln!("{}", format_record(record));
        }
        bail!(
            "{name}: {} of {} steps failed",
            failed.len(),
            summary.steps
        );
    }

    println!("{name}: {} steps ok", summary.steps);
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    println!();
    println!(
        "{} steps, {} header actions, {} footer actions, {} failed",
        summary.steps, summary.header_actions, summary.footer_actions, summary.failed_steps
    );
    if let Some(millis) = summary.header_last_updated_ms {
        println!("header last updated at {millis}ms since epoch");
    }
}
