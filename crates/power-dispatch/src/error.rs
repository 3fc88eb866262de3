//! Error kinds for conditions the protocol treats as programming-invariant
//! violations rather than recoverable outcomes (see spec §7: these abort the
//! handler that triggered them, they are never turned into a reply message).

use crate::domain::{ExchangeId, ProductionId};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An exchange id was added twice for the same production: either the
    /// producer minted colliding ids or processed the same offer twice.
    #[error("exchange {exchange_id} already recorded for production {production_id}")]
    DuplicateExchange { production_id: ProductionId, exchange_id: ExchangeId },
}

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// `find_production` assumes the id exists in the supplied list; its
    /// absence means an intervening commit raced the lookup.
    #[error("production {0} not found in expected set")]
    ProductionNotFound(ProductionId),

    /// A cancellation must never carry an empty exchange list; callers are
    /// responsible for this invariant (spec §7).
    #[error("received a cancellation with no exchanges")]
    EmptyCancellation,
}
