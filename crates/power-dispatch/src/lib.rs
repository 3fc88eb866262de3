//! Peer-to-peer negotiation protocol and per-node broker state machine for
//! a distributed power-dispatch adequacy problem: a network of autonomous
//! dispatcher nodes trades production capacity across inter-node borders to
//! collectively lower total cost, with no central coordinator.
//!
//! This crate covers the negotiation protocol itself — see [`broker`] for
//! the message handlers and [`dispatcher`]/[`registry`] for the in-process
//! actor substrate they run on. The local adequacy optimizer ([`adequacy`])
//! is a thin deterministic stand-in for what the source system treats as an
//! external collaborator.

pub mod adequacy;
pub mod broker;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod events;
pub mod ids;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod quiescence;
pub mod registry;
pub mod transport;

pub use broker::{Broker, BrokerConfig};
pub use dispatcher::{spawn_dispatcher, DispatcherHandle};
pub use quiescence::QuiescenceDetector;
pub use registry::ActorRegistry;
