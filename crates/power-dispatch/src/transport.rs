//! The messaging substrate's interface to the broker: fire-and-forget
//! `tell` and blocking request-response `ask`, addressed by node name
//! (spec §6). The broker never touches a dispatcher handle directly, only
//! this trait, so it can be driven by an in-memory registry in production
//! and by a hand-wired stub in unit tests.

use async_trait::async_trait;

use crate::domain::{ConsumerCanceledExchange, Exchange, NodeName, Proposal, ProposalOffer, Start};

/// Fire-and-forget messages a node can address to a neighbor.
#[derive(Debug, Clone)]
pub enum TellMessage {
    Start(Start),
    Proposal(Proposal),
    ConsumerCanceledExchange(ConsumerCanceledExchange),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Fire-and-forget delivery. Never fails observably to the caller: an
    /// unreachable peer is a transport-layer concern outside this
    /// specification's scope (spec §7).
    async fn tell(&self, to: &NodeName, message: TellMessage);

    /// Blocking request-response delivery of a [`ProposalOffer`], always
    /// replied to with the list of [`Exchange`]s the target is willing to
    /// grant (possibly empty).
    async fn ask_proposal_offer(&self, to: &NodeName, message: ProposalOffer) -> Vec<Exchange>;
}
