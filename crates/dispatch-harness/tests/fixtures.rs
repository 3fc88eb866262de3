use std::time::Duration;

use dispatch_harness::{named_fixture, run_to_quiescence, FIXTURE_NAMES};
use power_dispatch::domain::ProductionType;

#[tokio::test]
async fn every_catalogued_fixture_name_resolves() {
    for name in FIXTURE_NAMES {
        assert!(named_fixture(name).is_some(), "fixture {name} should build a scenario");
    }
    assert!(named_fixture("not-a-real-fixture").is_none());
}

#[tokio::test]
async fn two_node_slack_settles_with_a_importing_five_units() {
    let scenario = named_fixture("two-node-slack").unwrap();
    let totals = run_to_quiescence(scenario, Duration::from_millis(20)).await;

    let (_, a_total) = totals.iter().find(|(name, _)| name == "A").unwrap();
    assert_eq!(a_total.productions.iter().map(|p| p.quantity).sum::<u64>(), 5);
}

#[tokio::test]
async fn loop_prevention_cycle_still_quiesces() {
    let scenario = named_fixture("loop-prevention-cycle").unwrap();
    let totals = run_to_quiescence(scenario, Duration::from_millis(20)).await;
    assert_eq!(totals.len(), 3);
}

#[tokio::test]
async fn remainder_forward_sells_producers_full_capacity() {
    let scenario = named_fixture("remainder-forward").unwrap();
    let totals = run_to_quiescence(scenario, Duration::from_millis(20)).await;

    let (_, b_total) = totals.iter().find(|(name, _)| name == "B").unwrap();
    let b_production = b_total.productions.iter().find(|p| p.kind == ProductionType::Local).unwrap();
    assert_eq!(b_production.quantity, 10, "B's 10 units should be split 3-to-A direct, 7 forwarded on to D");
}

#[tokio::test]
async fn no_improvement_forward_leaves_the_cheaper_producer_untouched() {
    let scenario = named_fixture("no-improvement-forward").unwrap();
    let totals = run_to_quiescence(scenario, Duration::from_millis(20)).await;

    let (_, a_total) = totals.iter().find(|(name, _)| name == "A").unwrap();
    let a_production = a_total.productions.iter().find(|p| p.kind == ProductionType::Local).unwrap();
    assert_eq!(a_production.quantity, 5, "A's own cheaper production must still cover its demand");
}
