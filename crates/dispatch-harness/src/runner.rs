//! Drives a [`Scenario`] through the real registry/dispatcher/quiescence
//! substrate and collects every node's final allocation.

use std::sync::Arc;
use std::time::Duration;

use power_dispatch::broker::BrokerConfig;
use power_dispatch::config::Scenario;
use power_dispatch::domain::NodeTotal;
use power_dispatch::ids::UuidGenerator;
use power_dispatch::{spawn_dispatcher, ActorRegistry, QuiescenceDetector};
use uuid::Uuid;

/// Runs `scenario` to quiescence and returns `(node name, final total)` in
/// the order nodes were declared.
pub async fn run_to_quiescence(scenario: Scenario, idle_window: Duration) -> Vec<(String, NodeTotal)> {
    let registry = Arc::new(ActorRegistry::new());
    let waiter = Arc::new(QuiescenceDetector::new(idle_window));
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
        handles.push(spawn_dispatcher(config, registry.clone(), waiter.clone(), id_gen.clone()));
    }

    for handle in &handles {
        handle.tell_start();
    }
    waiter.wait_idle().await;

    let mut totals = Vec::with_capacity(handles.len());
    for handle in &handles {
        if let Some(total) = handle.next().await {
            totals.push((handle.name().clone(), total));
        }
    }
    totals
}
