//! A shared signal that lets an external driver wait until no dispatcher has
//! processed a message for a configured idle window (spec §4/§5/§9).
//!
//! This is a two-phase idle check, not a distributed termination protocol:
//! acceptable for in-process runs and test harnesses only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub struct QuiescenceDetector {
    updated: AtomicBool,
    idle_window: Duration,
}

impl QuiescenceDetector {
    pub fn new(idle_window: Duration) -> Self {
        Self { updated: AtomicBool::new(true), idle_window }
    }

    /// Every dispatcher calls this on every inbound message.
    pub fn notify(&self) {
        self.updated.store(true, Ordering::SeqCst);
    }

    /// Blocks until a full idle window has elapsed with no intervening
    /// `notify` call.
    pub async fn wait_idle(&self) {
        loop {
            self.updated.store(false, Ordering::SeqCst);
            tokio::time::sleep(self.idle_window).await;
            if !self.updated.load(Ordering::SeqCst) {
                return;
            }
        }
    }
}
