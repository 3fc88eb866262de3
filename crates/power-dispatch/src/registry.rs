//! Process-wide name-addressable registry of dispatcher handles.
//!
//! Brokers never hold a direct reference to a peer; they only know its
//! name, and the dispatcher actor resolves that name against this registry
//! on every `tell`/`ask` (spec §5/§9). Written only during actor
//! construction/teardown, read concurrently by every dispatcher task.

use dashmap::DashMap;

use crate::dispatcher::DispatcherHandle;
use crate::domain::NodeName;

#[derive(Default)]
pub struct ActorRegistry {
    handles: DashMap<NodeName, DispatcherHandle>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: NodeName, handle: DispatcherHandle) {
        self.handles.insert(name, handle);
    }

    pub fn unregister(&self, name: &NodeName) {
        self.handles.remove(name);
    }

    pub fn lookup(&self, name: &NodeName) -> Option<DispatcherHandle> {
        self.handles.get(name).map(|entry| entry.value().clone())
    }

    pub fn names(&self) -> Vec<NodeName> {
        self.handles.iter().map(|entry| entry.key().clone()).collect()
    }
}
