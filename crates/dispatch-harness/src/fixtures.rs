//! Builders for the six literal end-to-end scenarios used to sanity-check a
//! negotiation round: two-node slack import, three-node linear forwarding,
//! remainder forward, cancel-on-better-offer, loop prevention on a cycle,
//! and no-improvement re-forwarding.

use power_dispatch::config::{NodeSpec, ProductionSpec, Scenario};
use power_dispatch::domain::{Border, Consumption};

/// Names accepted by [`named_fixture`], in catalogue order.
pub const FIXTURE_NAMES: &[&str] = &[
    "two-node-slack",
    "three-node-linear",
    "remainder-forward",
    "cancel-on-better-offer",
    "loop-prevention-cycle",
    "no-improvement-forward",
];

pub fn named_fixture(name: &str) -> Option<Scenario> {
    match name {
        "two-node-slack" => Some(two_node_slack()),
        "three-node-linear" => Some(three_node_linear()),
        "remainder-forward" => Some(remainder_forward()),
        "cancel-on-better-offer" => Some(cancel_on_better_offer()),
        "loop-prevention-cycle" => Some(loop_prevention_cycle()),
        "no-improvement-forward" => Some(no_improvement_forward()),
        _ => None,
    }
}

fn consumption(cost: i64, quantity: u64) -> Consumption {
    Consumption { name: "demand".into(), cost, quantity }
}

fn production(cost: i64, quantity: u64) -> ProductionSpec {
    ProductionSpec { cost, quantity }
}

fn border(dest: &str, cost: i64) -> Border {
    Border { dest: dest.into(), cost, quantity: 100 }
}

/// A: cheap-penalty demand of 5. B: cheap producer of 10. A should import 5.
fn two_node_slack() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![consumption(10, 5)],
                productions: vec![production(2, 0)],
                borders: vec![border("B", 0)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(1, 10)],
                borders: vec![border("A", 0)],
            },
        ],
    }
}

/// A—B—C, C is the cheapest producer; A should import 4 units via B.
fn three_node_linear() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![consumption(20, 4)],
                productions: vec![],
                borders: vec![border("B", 1)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![],
                borders: vec![border("A", 1), border("C", 1)],
            },
            NodeSpec {
                name: "C".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(1, 10)],
                borders: vec![border("B", 1)],
            },
        ],
    }
}

/// A demands 3 against a 10-unit proposal; it should ask for 3 and forward
/// the leftover 7 along its own borders.
fn remainder_forward() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![consumption(20, 3)],
                productions: vec![],
                borders: vec![border("B", 0), border("D", 0)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(1, 10)],
                borders: vec![border("A", 0)],
            },
            NodeSpec {
                name: "D".into(),
                min_exchange: 1,
                consumptions: vec![consumption(50, 7)],
                productions: vec![],
                borders: vec![border("A", 0)],
            },
        ],
    }
}

/// A commits to B's expensive capacity first, then a cheaper proposal from
/// C arrives and supersedes it; A should cancel the exchange with B.
fn cancel_on_better_offer() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![consumption(100, 3)],
                productions: vec![],
                borders: vec![border("B", 0), border("C", 0)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(5, 10)],
                borders: vec![border("A", 0)],
            },
            NodeSpec {
                name: "C".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(1, 10)],
                borders: vec![border("A", 0)],
            },
        ],
    }
}

/// A→B→C→A cycle with no demand anywhere; the network must still quiesce,
/// which it only can if loop prevention actually suppresses the flood.
fn loop_prevention_cycle() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(1, 5)],
                borders: vec![border("B", 0), border("C", 0)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![],
                borders: vec![border("A", 0), border("C", 0)],
            },
            NodeSpec {
                name: "C".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![],
                borders: vec![border("B", 0), border("A", 0)],
            },
        ],
    }
}

/// B proposes at a cost too high to beat A's own local production; A should
/// re-forward the proposal unchanged rather than commit to it.
fn no_improvement_forward() -> Scenario {
    Scenario {
        nodes: vec![
            NodeSpec {
                name: "A".into(),
                min_exchange: 1,
                consumptions: vec![consumption(10, 5)],
                productions: vec![production(1, 5)],
                borders: vec![border("B", 0), border("C", 0)],
            },
            NodeSpec {
                name: "B".into(),
                min_exchange: 1,
                consumptions: vec![],
                productions: vec![production(50, 5)],
                borders: vec![border("A", 0)],
            },
            NodeSpec { name: "C".into(), min_exchange: 1, consumptions: vec![], productions: vec![], borders: vec![border("A", 0)] },
        ],
    }
}
