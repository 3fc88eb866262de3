//! The protocol engine: holds a node's identity, neighbors, local inputs,
//! current [`NodeState`] and exchange ledger, and implements the five
//! message handlers plus the outgoing-message construction rules (spec
//! §4.2-§4.9).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::adequacy::optimize_adequacy;
use crate::domain::{
    Border, ConsumerCanceledExchange, Consumption, Exchange, NodeName, NodeState,
    NodeTotal, Production, ProductionId, Proposal, ProposalOffer,
};
use crate::error::BrokerError;
use crate::ids::IdGenerator;
use crate::ledger::LedgerExchange;
use crate::transport::{TellMessage, Transport};

/// Construction parameters for a node (spec §6).
pub struct BrokerConfig {
    pub name: NodeName,
    pub min_exchange: u64,
    pub consumptions: Vec<Consumption>,
    pub productions: Vec<Production>,
    pub borders: Vec<Border>,
}

pub struct Broker {
    name: NodeName,
    min_exchange: u64,
    consumptions: Vec<Consumption>,
    /// Local productions as registered at construction time, with minted
    /// ids. Never mutated afterwards; `compute_total` reads costs from here.
    raw_productions: Vec<Production>,
    borders: Vec<Border>,
    ledger: LedgerExchange,
    state: NodeState,
    id_gen: Arc<dyn IdGenerator>,
    transport: Arc<dyn Transport>,
}

impl Broker {
    /// Sorts consumptions by cost descending (highest shedding penalty
    /// first, ties broken by input order), mints ids for local productions,
    /// and runs the initial solve. Sends no messages.
    pub fn new(config: BrokerConfig, id_gen: Arc<dyn IdGenerator>, transport: Arc<dyn Transport>) -> Self {
        let BrokerConfig { name, min_exchange, mut consumptions, productions, borders } = config;
        consumptions.sort_by(|a, b| b.cost.cmp(&a.cost));

        let raw_productions: Vec<Production> = productions
            .into_iter()
            .map(|p| Production::local(id_gen.generate(), p.cost, p.quantity))
            .collect();

        let state = optimize_adequacy(&consumptions, &raw_productions);
        info!(node = %name, cost = state.cost, "initial adequacy solved");

        Self {
            name,
            min_exchange: min_exchange.max(1),
            consumptions,
            raw_productions,
            borders,
            ledger: LedgerExchange::new(),
            state,
            id_gen,
            transport,
        }
    }

    pub fn name(&self) -> &NodeName {
        &self.name
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Handles `Start`: advertises all currently free local slack to every
    /// border (spec §4.3).
    #[instrument(skip(self), fields(node = %self.name))]
    pub async fn init(&mut self) {
        let productions = self.state.productions_free.clone();
        self.send_proposal(&productions, Vec::new()).await;
    }

    /// Sends a [`Proposal`] for each `(production, border)` pair, skipping
    /// any border whose destination already appears in the prospective
    /// `path_node` (loop prevention, spec §3/§8).
    async fn send_proposal(&self, productions: &[Production], prior_path: Vec<NodeName>) {
        for border in &self.borders {
            let path_node: Vec<NodeName> =
                std::iter::once(self.name.clone()).chain(prior_path.iter().cloned()).collect();
            if path_node.contains(&border.dest) {
                continue;
            }
            for production in productions {
                let proposal = Proposal {
                    production_id: production.id,
                    cost: production.cost + border.cost,
                    quantity: production.quantity,
                    path_node: path_node.clone(),
                };
                debug!(node = %self.name, to = %border.dest, ?proposal, "send proposal");
                self.transport.tell(&border.dest, TellMessage::Proposal(proposal)).await;
            }
        }
    }

    /// Handles an incoming [`Proposal`] (tell, spec §4.4): integrates it as
    /// a tentative import and either commits via [`Self::make_offer`] or
    /// re-forwards it unchanged.
    #[instrument(skip(self, proposal), fields(node = %self.name))]
    pub async fn receive_proposal(&mut self, proposal: Proposal) -> Result<(), BrokerError> {
        let candidate = Production::import(proposal.production_id, proposal.cost, proposal.quantity);
        let mut candidates = vec![candidate.clone()];
        candidates.extend(self.state.productions_used.iter().cloned());
        candidates.extend(self.state.productions_free.iter().cloned());

        let new_state = optimize_adequacy(&self.consumptions, &candidates);
        if new_state.cost < self.state.cost {
            self.make_offer(proposal, new_state).await
        } else {
            self.send_proposal(std::slice::from_ref(&candidate), proposal.path_node).await;
            Ok(())
        }
    }

    /// Accepts an improving proposal: asks the producer to commit, folds
    /// the resulting exchanges into the node's state, forwards any leftover
    /// quantity, and cancels exchanges the new state no longer needs (spec
    /// §4.5).
    async fn make_offer(&mut self, proposal: Proposal, new_state: NodeState) -> Result<(), BrokerError> {
        let prod_asked = find_production(&new_state.productions_used, proposal.production_id)?;
        let asked_quantity = prod_asked.quantity;

        let return_path_node: Vec<NodeName> = proposal
            .path_node
            .iter()
            .rev()
            .skip(1)
            .cloned()
            .chain(std::iter::once(self.name.clone()))
            .collect();

        let offer = ProposalOffer {
            production_id: proposal.production_id,
            cost: proposal.cost,
            quantity: asked_quantity,
            path_node: proposal.path_node.clone(),
            return_path_node,
        };

        let next_hop = offer.path_node[0].clone();
        let exchanges = self.transport.ask_proposal_offer(&next_hop, offer).await;
        let given_quantity: u64 = exchanges.iter().map(|e| e.quantity).sum();

        let mut imported = Vec::with_capacity(exchanges.len());
        for mut exchange in exchanges {
            exchange.path_node = proposal.path_node.clone();
            imported.push(Production::exchange(exchange.production_id, proposal.cost, exchange.quantity, exchange));
        }

        let mut candidates = imported;
        candidates.extend(self.state.productions_used.iter().cloned());
        candidates.extend(self.state.productions_free.iter().cloned());
        self.state = optimize_adequacy(&self.consumptions, &candidates);

        self.send_remain_proposal(&proposal, asked_quantity, given_quantity).await;

        let useless: Vec<Exchange> =
            self.state.productions_free.iter().filter_map(|p| p.exchange.clone()).collect();
        self.send_cancel_exchange(useless).await;

        Ok(())
    }

    /// Forwards the leftover quantity of a proposal when the producer fully
    /// satisfied what was asked but the local solve chose to ask for less
    /// than the whole proposal. If the producer delivered less than asked,
    /// no remainder is forwarded (spec §4.5/§9 — intentionally ambiguous in
    /// the source system, see DESIGN.md).
    async fn send_remain_proposal(&self, proposal: &Proposal, asked_quantity: u64, given_quantity: u64) {
        if asked_quantity < proposal.quantity && asked_quantity == given_quantity {
            let remainder = Production::import(proposal.production_id, proposal.cost, proposal.quantity - asked_quantity);
            self.send_proposal(std::slice::from_ref(&remainder), proposal.path_node.clone()).await;
        }
    }

    /// Groups orphaned exchanges by production and tells each group's
    /// producing path to release them.
    async fn send_cancel_exchange(&self, exchanges: Vec<Exchange>) {
        let mut groups: HashMap<ProductionId, (Vec<Exchange>, Vec<NodeName>)> = HashMap::new();
        for exchange in exchanges {
            let entry = groups.entry(exchange.production_id).or_insert_with(|| (Vec::new(), exchange.path_node.clone()));
            entry.1 = exchange.path_node.clone();
            entry.0.push(exchange);
        }

        for (_, (exchanges, path_node)) in groups {
            let next_hop = path_node[0].clone();
            let cancel = ConsumerCanceledExchange { exchanges, path_node };
            self.transport.tell(&next_hop, TellMessage::ConsumerCanceledExchange(cancel)).await;
        }
    }

    /// Handles a [`ProposalOffer`] (ask, spec §4.6). Intermediate hops
    /// forward it one step closer to the producer and relay the reply
    /// verbatim; the producing hop serves what it can from free capacity
    /// not already committed in its ledger.
    #[instrument(skip(self, offer), fields(node = %self.name))]
    pub async fn receive_proposal_offer(&mut self, offer: ProposalOffer) -> Result<Vec<Exchange>, BrokerError> {
        if offer.path_node.len() > 1 {
            let mut forwarded = offer;
            forwarded.path_node = forwarded.path_node[1..].to_vec();
            let next_hop = forwarded.path_node[0].clone();
            return Ok(self.transport.ask_proposal_offer(&next_hop, forwarded).await);
        }

        let free = find_production(&self.state.productions_free, offer.production_id)?;
        let quantity_free = free.quantity;
        let quantity_used = self.ledger.sum_production(offer.production_id);
        let available = quantity_free.saturating_sub(quantity_used);
        let quantity_exchange = offer.quantity.min(available);

        if quantity_exchange == 0 {
            return Ok(Vec::new());
        }

        let exchanges =
            self.generate_exchanges(offer.production_id, quantity_exchange, offer.return_path_node.clone());
        self.ledger.add_all(exchanges.clone())?;
        Ok(exchanges)
    }

    /// Handles a [`ConsumerCanceledExchange`] (tell, spec §4.7). Intermediate
    /// hops forward it one step closer to the producer; the producing hop
    /// removes the exchanges from its ledger and reopens bidding for the
    /// freed capacity. The node's own [`NodeState`] is not re-solved here —
    /// the freed capacity becomes visible through the next proposal
    /// integration (spec §9).
    #[instrument(skip(self, cancel), fields(node = %self.name))]
    pub async fn receive_cancel_exchange(&mut self, cancel: ConsumerCanceledExchange) -> Result<(), BrokerError> {
        if cancel.path_node.len() > 1 {
            let mut forwarded = cancel;
            forwarded.path_node = forwarded.path_node[1..].to_vec();
            let next_hop = forwarded.path_node[0].clone();
            self.transport.tell(&next_hop, TellMessage::ConsumerCanceledExchange(forwarded)).await;
            return Ok(());
        }

        if cancel.exchanges.is_empty() {
            return Err(BrokerError::EmptyCancellation);
        }

        self.ledger.delete_all(&cancel.exchanges);
        let quantity: u64 = cancel.exchanges.iter().map(|e| e.quantity).sum();
        let production_id = cancel.exchanges[0].production_id;
        let cost = find_production(&self.raw_productions, production_id)?.cost;

        let freed = Production::local(production_id, cost, quantity);
        warn!(node = %self.name, production = %production_id, quantity, "exchange canceled, reopening bidding");
        self.send_proposal(std::slice::from_ref(&freed), Vec::new()).await;
        Ok(())
    }

    /// Splits `quantity` into `floor(quantity / min_exchange)` exchanges of
    /// size `min_exchange`, plus at most one remainder exchange, each with
    /// a freshly minted id (spec §4.8).
    fn generate_exchanges(&self, production_id: ProductionId, quantity: u64, path_node: Vec<NodeName>) -> Vec<Exchange> {
        let chunks = quantity / self.min_exchange;
        let mut exchanges: Vec<Exchange> = (0..chunks)
            .map(|_| Exchange {
                id: self.id_gen.generate(),
                production_id,
                quantity: self.min_exchange,
                path_node: path_node.clone(),
            })
            .collect();

        let remainder = quantity - chunks * self.min_exchange;
        if remainder > 0 {
            exchanges.push(Exchange {
                id: self.id_gen.generate(),
                production_id,
                quantity: remainder,
                path_node,
            });
        }
        exchanges
    }

    /// Handles `Next`: reports each production's quantity as the locally
    /// consumed portion plus the portion sold abroad (spec §4.9).
    pub fn compute_total(&self) -> NodeTotal {
        let productions = self
            .raw_productions
            .iter()
            .map(|p| {
                let used: u64 = self
                    .state
                    .productions_used
                    .iter()
                    .filter(|u| u.id == p.id)
                    .map(|u| u.quantity)
                    .sum();
                p.with_quantity(used + self.ledger.sum_production(p.id))
            })
            .collect();

        NodeTotal { consumptions: self.consumptions.clone(), productions, borders: Vec::new() }
    }
}

fn find_production(productions: &[Production], id: ProductionId) -> Result<&Production, BrokerError> {
    productions.iter().find(|p| p.id == id).ok_or(BrokerError::ProductionNotFound(id))
}
