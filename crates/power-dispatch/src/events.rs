//! Observability trace entries appended by a dispatcher on every inbound
//! message, exposed via [`crate::domain::SnapshotView`] in reply to a
//! [`crate::domain::Snapshot`] request (spec §4.10).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Recv,
    RecvRes,
    Tell,
    Ask,
    AskRes,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Recv => "recv",
            EventKind::RecvRes => "recv res",
            EventKind::Tell => "tell",
            EventKind::Ask => "ask",
            EventKind::AskRes => "ask res",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// Debug rendering of the message payload, kept as text so the trace
    /// can hold heterogeneous message types without a second message enum.
    pub message: String,
}

impl Event {
    pub fn new(kind: EventKind, message: impl fmt::Debug) -> Self {
        Self { kind, message: format!("{message:?}") }
    }
}
