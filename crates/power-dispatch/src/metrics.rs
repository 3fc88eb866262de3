//! Protocol-level counters and gauges, recorded via the plain `metrics`
//! facade rather than a derive macro: this crate has no single long-lived
//! "service" struct to attach metrics to, just per-dispatcher free functions
//! called from [`crate::dispatcher`].

use metrics::{counter, gauge};

/// A [`crate::domain::Proposal`] was sent to a neighbor.
pub fn record_proposal_sent(node: &str) {
    counter!("power_dispatch_proposals_sent_total", "node" => node.to_string()).increment(1);
}

/// A [`crate::domain::Proposal`] was received and integrated.
pub fn record_proposal_received(node: &str) {
    counter!("power_dispatch_proposals_received_total", "node" => node.to_string()).increment(1);
}

/// A [`crate::domain::ProposalOffer`] round-trip committed `quantity` units.
pub fn record_exchange_committed(node: &str, quantity: u64) {
    counter!("power_dispatch_exchanges_committed_total", "node" => node.to_string()).increment(1);
    counter!("power_dispatch_exchange_quantity_total", "node" => node.to_string()).increment(quantity);
}

/// A [`crate::domain::ConsumerCanceledExchange`] released committed capacity.
pub fn record_exchange_canceled(node: &str, quantity: u64) {
    counter!("power_dispatch_exchanges_canceled_total", "node" => node.to_string()).increment(1);
    counter!("power_dispatch_canceled_quantity_total", "node" => node.to_string()).increment(quantity);
}

/// Number of dispatcher actors currently registered.
pub fn record_active_nodes(count: u64) {
    gauge!("power_dispatch_active_nodes").set(count as f64);
}
