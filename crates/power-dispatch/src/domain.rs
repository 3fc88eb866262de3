//! Value types for the dispatch network: demand/supply records, inter-node
//! borders, committed exchanges, and the messages brokers trade with their
//! neighbors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;

/// Name of a dispatcher node, used throughout as the addressing key.
pub type NodeName = String;

/// Id of a [`Production`], minted once when the production is first
/// registered on its owning node and carried along on every import/exchange
/// copy that travels the network.
pub type ProductionId = Uuid;

/// Id of a single committed [`Exchange`].
pub type ExchangeId = Uuid;

/// An inelastic demand with a shedding penalty `cost` per unserved unit.
/// Immutable once a node is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub name: String,
    pub cost: i64,
    pub quantity: u64,
}

/// Where a [`Production`]'s capacity originates from the owning node's point
/// of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionType {
    /// On-node capacity.
    Local,
    /// A tentative remote capacity being evaluated, synthesized from an
    /// incoming [`Proposal`].
    Import,
    /// A committed remote capacity backed by a specific [`Exchange`].
    Exchange,
}

/// A supply offer: `quantity` units available at `cost` per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub id: ProductionId,
    pub cost: i64,
    pub quantity: u64,
    #[serde(rename = "type")]
    pub kind: ProductionType,
    /// Set only for `kind == Exchange`; the committed record this
    /// production's capacity is backed by.
    pub exchange: Option<Exchange>,
}

impl Production {
    pub fn local(id: ProductionId, cost: i64, quantity: u64) -> Self {
        Self { id, cost, quantity, kind: ProductionType::Local, exchange: None }
    }

    pub fn import(id: ProductionId, cost: i64, quantity: u64) -> Self {
        Self { id, cost, quantity, kind: ProductionType::Import, exchange: None }
    }

    pub fn exchange(id: ProductionId, cost: i64, quantity: u64, exchange: Exchange) -> Self {
        Self { id, cost, quantity, kind: ProductionType::Exchange, exchange: Some(exchange) }
    }

    /// A copy of this production with its quantity replaced, keeping id,
    /// cost, kind and exchange backing untouched.
    pub fn with_quantity(&self, quantity: u64) -> Self {
        Self { quantity, ..self.clone() }
    }
}

/// A directed link to a neighbor node, adding `cost` per unit transported.
///
/// `quantity` is the link's nominal transport capacity. Enforcing it against
/// committed exchanges is an acknowledged TODO carried over from the source
/// system (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub dest: NodeName,
    pub cost: i64,
    pub quantity: u64,
}

/// A committed unit-of-transfer record.
///
/// `path_node` is the ordered list of node names the exchange traverses,
/// starting at the consumer's next hop and ending with the producer's own
/// name last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub production_id: ProductionId,
    pub quantity: u64,
    pub path_node: Vec<NodeName>,
}

/// Snapshot of one node's locally optimal allocation over its current known
/// production set, as returned by the adequacy solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub cost: i64,
    pub productions_used: Vec<Production>,
    pub productions_free: Vec<Production>,
}

/// Sent by the driver to every node to kick off the negotiation round. No
/// reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Start;

/// Advertises `quantity` units of capacity at `cost` per unit, sent node to
/// neighbor (tell). `path_node`'s first element is the next hop to deliver
/// to; later elements are remaining hops, with the originator's name
/// appended last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub production_id: ProductionId,
    pub cost: i64,
    pub quantity: u64,
    pub path_node: Vec<NodeName>,
}

/// A binding request to commit against a [`Proposal`], sent node to origin
/// (ask). Replies with the list of [`Exchange`]s the producer is willing to
/// grant, which may be fewer or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalOffer {
    pub production_id: ProductionId,
    pub cost: i64,
    pub quantity: u64,
    pub path_node: Vec<NodeName>,
    pub return_path_node: Vec<NodeName>,
}

/// Releases previously committed exchanges that a node no longer wants,
/// sent node to neighbor (tell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCanceledExchange {
    pub exchanges: Vec<Exchange>,
    pub path_node: Vec<NodeName>,
}

/// Introspection request: asks a node to hand back its current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot;

/// A read-only view of a node returned in reply to [`Snapshot`]: its current
/// state plus the trace of messages it has processed so far (spec §4.10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotView {
    pub name: NodeName,
    pub state: NodeState,
    pub events: Vec<Event>,
}

/// Harvests a node's final allocation once the network has gone quiescent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Next;

/// Reply to [`Next`]: each production's quantity is replaced by the portion
/// consumed locally plus the portion sold abroad. The third element is a
/// placeholder for per-border totals, never populated (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTotal {
    pub consumptions: Vec<Consumption>,
    pub productions: Vec<Production>,
    pub borders: Vec<Border>,
}
