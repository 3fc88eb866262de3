//! Adapter over the local adequacy optimizer.
//!
//! The real optimizer is an external collaborator (spec §1/§6): a pure
//! function mapping `(consumptions, productions)` to a [`NodeState`] that
//! picks a cheapest-first subset of productions covering demand. The
//! negotiation protocol only depends on its *contract* — stable cheapest
//! ordering, used/free partition by quantity, total cost including
//! shedding — never on a particular algorithm, so this module provides a
//! small deterministic implementation of that contract rather than pulling
//! in an external solver crate.

use std::collections::HashMap;

use crate::domain::{Consumption, NodeState, Production};

/// Covers `consumptions` with `productions`, cheapest production first,
/// serving consumptions in the order given (callers are expected to have
/// already sorted them by shedding priority, see [`crate::broker::Broker`]).
///
/// Each input production may be split across the returned `productions_used`
/// and `productions_free` lists: the used portion keeps the production's id,
/// cost and kind but carries only the quantity actually consumed, and the
/// free portion (if any remains) carries the remainder. Every input
/// production therefore contributes total quantity `used + free` equal to
/// its own quantity, which is the sense in which the two output lists
/// "partition" the input (spec §3, NodeState invariant).
pub fn optimize_adequacy(consumptions: &[Consumption], productions: &[Production]) -> NodeState {
    let mut order: Vec<usize> = (0..productions.len()).collect();
    order.sort_by(|&a, &b| productions[a].cost.cmp(&productions[b].cost));

    let mut remaining: Vec<u64> = productions.iter().map(|p| p.quantity).collect();
    let mut used: HashMap<usize, u64> = HashMap::new();
    let mut cost: i64 = 0;

    for consumption in consumptions {
        let mut need = consumption.quantity;
        for &idx in &order {
            if need == 0 {
                break;
            }
            let free = remaining[idx];
            if free == 0 {
                continue;
            }
            let take = free.min(need);
            remaining[idx] -= take;
            *used.entry(idx).or_insert(0) += take;
            need -= take;
            cost += take as i64 * productions[idx].cost;
        }
        if need > 0 {
            cost += need as i64 * consumption.cost;
        }
    }

    let mut productions_used = Vec::new();
    let mut productions_free = Vec::new();
    for &idx in &order {
        let p = &productions[idx];
        if let Some(&qty) = used.get(&idx) {
            if qty > 0 {
                productions_used.push(p.with_quantity(qty));
            }
        }
        if remaining[idx] > 0 {
            productions_free.push(p.with_quantity(remaining[idx]));
        }
    }

    NodeState { cost, productions_used, productions_free }
}
