use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use tracing::info;
use uuid::Uuid;

use power_dispatch::broker::BrokerConfig;
use power_dispatch::config::{Args, Scenario};
use power_dispatch::domain::NodeTotal;
use power_dispatch::ids::UuidGenerator;
use power_dispatch::{logging, spawn_dispatcher, ActorRegistry, QuiescenceDetector};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)?;
    info!(nodes = scenario.nodes.len(), scenario = %args.scenario.display(), "loaded scenario");

    let registry = Arc::new(ActorRegistry::new());
    let waiter = Arc::new(QuiescenceDetector::new(args.idle_window()));
    let id_gen = Arc::new(UuidGenerator);

    let mut handles = Vec::with_capacity(scenario.nodes.len());
    for node in scenario.nodes {
        let productions = node.productions.into_iter().map(|p| p.into_production(Uuid::nil())).collect();
        let config = BrokerConfig {
            name: node.name,
            min_exchange: node.min_exchange,
            consumptions: node.consumptions,
            productions,
            borders: node.borders,
        };
        let handle = spawn_dispatcher(config, registry.clone(), waiter.clone(), id_gen.clone());
        handles.push(handle);
    }

    for handle in &handles {
        handle.tell_start();
    }

    waiter.wait_idle().await;
    info!("network quiesced");

    let mut totals: Vec<(String, NodeTotal)> = Vec::with_capacity(handles.len());
    for handle in &handles {
        if let Some(total) = handle.next().await {
            totals.push((handle.name().clone(), total));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print_report(&totals);
    }

    Ok(())
}

fn print_report(totals: &[(String, NodeTotal)]) {
    for (name, total) in totals {
        println!("== {name} ==");
        for consumption in &total.consumptions {
            println!("  consumption {} cost={} quantity={}", consumption.name, consumption.cost, consumption.quantity);
        }
        for production in &total.productions {
            println!("  production {} cost={} quantity={}", production.id, production.cost, production.quantity);
        }
    }
}
