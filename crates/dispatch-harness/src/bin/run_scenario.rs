use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dispatch_harness::{named_fixture, run_to_quiescence, FIXTURE_NAMES};
use eyre::{eyre, Result};
use power_dispatch::config::Scenario;
use tracing::info;

/// Runs a power-dispatch scenario end to end and prints each node's final
/// allocation. Use `--list` to see the built-in fixtures, or `--scenario`
/// to point at a custom YAML/JSON file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One of the built-in fixture names (see `--list`).
    #[arg(short, long, conflicts_with = "scenario")]
    fixture: Option<String>,

    /// Path to a custom scenario file.
    #[arg(short, long, conflicts_with = "fixture")]
    scenario: Option<PathBuf>,

    /// Print the available fixture names and exit.
    #[arg(long)]
    list: bool,

    #[arg(long, default_value_t = 200, value_name = "MILLIS")]
    idle_window_ms: u64,

    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    power_dispatch::logging::init_logging();
    let args = Args::parse();

    if args.list {
        for name in FIXTURE_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let scenario = match (&args.fixture, &args.scenario) {
        (Some(name), _) => named_fixture(name).ok_or_else(|| eyre!("unknown fixture {name:?}, see --list"))?,
        (None, Some(path)) => Scenario::load(path)?,
        (None, None) => return Err(eyre!("pass --fixture <name> or --scenario <path>, see --list")),
    };

    info!(nodes = scenario.nodes.len(), "running scenario");
    let totals = run_to_quiescence(scenario, Duration::from_millis(args.idle_window_ms)).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        for (name, total) in &totals {
            println!("== {name} ==");
            for production in &total.productions {
                println!("  production {} cost={} quantity={}", production.id, production.cost, production.quantity);
            }
        }
    }

    Ok(())
}
