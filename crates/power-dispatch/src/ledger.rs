//! The authoritative per-node record of outgoing exchanges, grouped by the
//! production they draw from.

use std::collections::HashMap;

use crate::domain::{Exchange, ExchangeId, ProductionId};
use crate::error::LedgerError;

/// `production_id -> { exchange_id -> Exchange }`.
#[derive(Debug, Default)]
pub struct LedgerExchange {
    ledger: HashMap<ProductionId, HashMap<ExchangeId, Exchange>>,
}

impl LedgerExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `(production_id, exchange_id)` already exists.
    pub fn add(&mut self, exchange: Exchange) -> Result<(), LedgerError> {
        let by_exchange = self.ledger.entry(exchange.production_id).or_default();
        if by_exchange.contains_key(&exchange.id) {
            return Err(LedgerError::DuplicateExchange {
                production_id: exchange.production_id,
                exchange_id: exchange.id,
            });
        }
        by_exchange.insert(exchange.id, exchange);
        Ok(())
    }

    /// Sequential add; the whole batch is treated as a single offer commit.
    pub fn add_all(&mut self, exchanges: Vec<Exchange>) -> Result<(), LedgerError> {
        for exchange in exchanges {
            self.add(exchange)?;
        }
        Ok(())
    }

    /// Removes one exchange. Missing entries are silently ignored.
    pub fn delete(&mut self, exchange: &Exchange) {
        if let Some(by_exchange) = self.ledger.get_mut(&exchange.production_id) {
            by_exchange.remove(&exchange.id);
        }
    }

    /// Sequential delete; missing entries are silently skipped.
    pub fn delete_all(&mut self, exchanges: &[Exchange]) {
        for exchange in exchanges {
            self.delete(exchange);
        }
    }

    /// 0 for an unknown production id, else the sum of quantities currently
    /// recorded for it.
    pub fn sum_production(&self, production_id: ProductionId) -> u64 {
        self.ledger
            .get(&production_id)
            .map(|by_exchange| by_exchange.values().map(|e| e.quantity).sum())
            .unwrap_or(0)
    }
}
