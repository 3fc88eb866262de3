//! Scenario configuration: the set of nodes and their construction
//! parameters (spec §6), loaded from a YAML or JSON file, plus the CLI
//! arguments that drive a single end-to-end run.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Border, Consumption, NodeName, Production, ProductionId};

/// One node's construction parameters, as they appear in a scenario file.
/// Distinct from [`crate::broker::BrokerConfig`]: here productions carry no
/// id yet, since minting ids is the broker's job at construction time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeSpec {
    pub name: NodeName,
    #[serde(default = "default_min_exchange")]
    pub min_exchange: u64,
    #[serde(default)]
    pub consumptions: Vec<Consumption>,
    #[serde(default)]
    pub productions: Vec<ProductionSpec>,
    #[serde(default)]
    pub borders: Vec<Border>,
}

fn default_min_exchange() -> u64 {
    1
}

/// A production as declared in a scenario file: no id, since [`NodeSpec`]
/// productions are always local and get one minted on construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductionSpec {
    pub cost: i64,
    pub quantity: u64,
}

impl ProductionSpec {
    pub fn into_production(self, id: ProductionId) -> Production {
        Production::local(id, self.cost, self.quantity)
    }
}

/// A full scenario: the set of node specs to spawn as dispatchers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    pub nodes: Vec<NodeSpec>,
}

impl Scenario {
    pub fn load(path: &PathBuf) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading scenario file {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw).wrap_err("parsing scenario as JSON"),
            _ => serde_yaml::from_str(&raw).wrap_err("parsing scenario as YAML"),
        }
    }
}

/// Runs a power-dispatch negotiation scenario to quiescence and reports each
/// node's final allocation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a scenario file (YAML or JSON, see [`Scenario`]).
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// How long the network must go silent before it's considered settled.
    #[arg(long, default_value_t = 200, value_name = "MILLIS")]
    pub idle_window_ms: u64,

    /// Emit the final report as JSON instead of a human-readable table.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }
}
