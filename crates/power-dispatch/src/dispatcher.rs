//! Adapts a [`Broker`] to the messaging substrate: routes inbound messages
//! to broker handlers and supplies the tell/ask closures the broker uses to
//! address peers by name (spec §4.10).
//!
//! Each dispatcher owns one mailbox, processed one message at a time by a
//! single spawned task — no broker handler is ever re-entered while a prior
//! one is in flight (spec §5).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::broker::{Broker, BrokerConfig};
use crate::domain::{Exchange, NodeName, NodeTotal, ProposalOffer, SnapshotView, Start};
use crate::events::{Event, EventKind};
use crate::ids::IdGenerator;
use crate::metrics;
use crate::quiescence::QuiescenceDetector;
use crate::registry::ActorRegistry;
use crate::transport::{TellMessage, Transport};

enum Command {
    Tell(TellMessage),
    AskProposalOffer(ProposalOffer, oneshot::Sender<Vec<Exchange>>),
    Snapshot(oneshot::Sender<SnapshotView>),
    Next(oneshot::Sender<NodeTotal>),
}

/// A cheap, cloneable address for a dispatcher's mailbox. What the registry
/// stores and what the broker's [`Transport`] resolves names to.
#[derive(Clone)]
pub struct DispatcherHandle {
    name: NodeName,
    sender: mpsc::UnboundedSender<Command>,
}

impl DispatcherHandle {
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    pub fn tell_start(&self) {
        let _ = self.sender.send(Command::Tell(TellMessage::Start(Start)));
    }

    fn tell(&self, message: TellMessage) {
        let _ = self.sender.send(Command::Tell(message));
    }

    async fn ask_proposal_offer(&self, message: ProposalOffer) -> Vec<Exchange> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Command::AskProposalOffer(message, tx)).is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub async fn snapshot(&self) -> Option<SnapshotView> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(Command::Snapshot(tx)).ok()?;
        rx.await.ok()
    }

    pub async fn next(&self) -> Option<NodeTotal> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(Command::Next(tx)).ok()?;
        rx.await.ok()
    }
}

/// The [`Transport`] implementation backing every broker: resolves a node
/// name against the shared registry and records a trace [`Event`] for each
/// delivery, mirroring the actor's own `tell_to`/`ask_to` bookkeeping.
struct RegistryTransport {
    from: NodeName,
    registry: Arc<ActorRegistry>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RegistryTransport {
    fn record(&self, kind: EventKind, message: impl std::fmt::Debug) {
        self.events.lock().unwrap().push(Event::new(kind, message));
    }
}

#[async_trait]
impl Transport for RegistryTransport {
    async fn tell(&self, to: &NodeName, message: TellMessage) {
        self.record(EventKind::Tell, &message);
        if matches!(message, TellMessage::Proposal(_)) {
            metrics::record_proposal_sent(&self.from);
        }
        match self.registry.lookup(to) {
            Some(handle) => handle.tell(message),
            None => warn!(to = %to, "tell addressed to unknown node"),
        }
    }

    async fn ask_proposal_offer(&self, to: &NodeName, message: ProposalOffer) -> Vec<Exchange> {
        self.record(EventKind::Ask, &message);
        let reply = match self.registry.lookup(to) {
            Some(handle) => handle.ask_proposal_offer(message).await,
            None => {
                warn!(to = %to, "ask addressed to unknown node");
                Vec::new()
            }
        };
        self.record(EventKind::AskRes, &reply);
        reply
    }
}

/// Spawns a dispatcher task owning a fresh [`Broker`], registers it under
/// its name, and returns a handle for addressing it.
pub fn spawn_dispatcher(
    config: BrokerConfig,
    registry: Arc<ActorRegistry>,
    waiter: Arc<QuiescenceDetector>,
    id_gen: Arc<dyn IdGenerator>,
) -> DispatcherHandle {
    let name = config.name.clone();
    let (tx, rx) = mpsc::unbounded_channel();
    let events = Arc::new(Mutex::new(Vec::new()));

    let transport: Arc<dyn Transport> =
        Arc::new(RegistryTransport { from: name.clone(), registry: registry.clone(), events: events.clone() });
    let broker = Broker::new(config, id_gen, transport);

    let handle = DispatcherHandle { name: name.clone(), sender: tx };
    registry.register(name.clone(), handle.clone());
    metrics::record_active_nodes(registry.names().len() as u64);

    tokio::spawn(run(name, broker, rx, events, waiter, registry));
    handle
}

async fn run(
    name: NodeName,
    mut broker: Broker,
    mut mailbox: mpsc::UnboundedReceiver<Command>,
    events: Arc<Mutex<Vec<Event>>>,
    waiter: Arc<QuiescenceDetector>,
    registry: Arc<ActorRegistry>,
) {
    while let Some(command) = mailbox.recv().await {
        waiter.notify();
        match command {
            Command::Tell(TellMessage::Start(msg)) => {
                events.lock().unwrap().push(Event::new(EventKind::Recv, &msg));
                broker.init().await;
            }
            Command::Tell(TellMessage::Proposal(proposal)) => {
                events.lock().unwrap().push(Event::new(EventKind::Recv, &proposal));
                metrics::record_proposal_received(&name);
                if let Err(err) = broker.receive_proposal(proposal).await {
                    warn!(node = %name, error = %err, "receive_proposal failed");
                }
            }
            Command::Tell(TellMessage::ConsumerCanceledExchange(cancel)) => {
                events.lock().unwrap().push(Event::new(EventKind::Recv, &cancel));
                let quantity: u64 = cancel.exchanges.iter().map(|e| e.quantity).sum();
                metrics::record_exchange_canceled(&name, quantity);
                if let Err(err) = broker.receive_cancel_exchange(cancel).await {
                    warn!(node = %name, error = %err, "receive_cancel_exchange failed");
                }
            }
            Command::AskProposalOffer(offer, reply) => {
                events.lock().unwrap().push(Event::new(EventKind::Recv, &offer));
                let result = broker.receive_proposal_offer(offer).await;
                let exchanges = match result {
                    Ok(exchanges) => exchanges,
                    Err(err) => {
                        warn!(node = %name, error = %err, "receive_proposal_offer failed");
                        Vec::new()
                    }
                };
                let granted: u64 = exchanges.iter().map(|e| e.quantity).sum();
                if granted > 0 {
                    metrics::record_exchange_committed(&name, granted);
                }
                events.lock().unwrap().push(Event::new(EventKind::RecvRes, &exchanges));
                let _ = reply.send(exchanges);
            }
            Command::Snapshot(reply) => {
                let view = SnapshotView {
                    name: broker.name().clone(),
                    state: broker.state().clone(),
                    events: events.lock().unwrap().clone(),
                };
                let _ = reply.send(view);
            }
            Command::Next(reply) => {
                let total = broker.compute_total();
                let _ = reply.send(total);
            }
        }
    }
    registry.unregister(&name);
    metrics::record_active_nodes(registry.names().len() as u64);
}
