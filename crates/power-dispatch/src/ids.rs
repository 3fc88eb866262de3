//! Injectable id source, so tests can supply deterministic ids instead of
//! the default globally-unique generator (spec §6).

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Default generator: a fresh v4 uuid per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator for tests: produces ids from a counter seeded
/// into uuid's fixed fields, so assertions can name ids by sequence number.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Uuid::from_u128(n as u128)
    }
}
