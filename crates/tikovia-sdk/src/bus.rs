//! In-process event bus for cross-screen invalidation
//!
//! Synchronous, best-effort fan-out. Publishing invokes every live
//! subscriber for the topic before returning; there is no queue and no
//! replay, so a subscriber attached after a publish has missed it. The
//! mutation path stays correct without any subscribers at all, listeners
//! only refresh what they already show.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use tikovia_types::Topic;

type Handler = Arc<dyn Fn(Option<&serde_json::Value>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<Topic, Vec<(u64, Handler)>>,
}

/// Synchronous publish/subscribe hub, cheap to clone
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `topic`. Delivery stops when the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(Option<&serde_json::Value>) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .handlers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            topic,
            id,
        }
    }

    /// Publish `topic` with no payload
    pub fn publish(&self, topic: Topic) {
        self.publish_with(topic, None);
    }

    /// Publish `topic`, handing each subscriber the optional payload.
    ///
    /// Handlers run in subscription order on the calling thread. The
    /// registry lock is released before any handler runs, so handlers may
    /// subscribe, unsubscribe, or publish again without deadlocking. A
    /// panicking handler is logged and skipped; the rest still run.
    pub fn publish_with(&self, topic: Topic, payload: Option<&serde_json::Value>) {
        let snapshot: Vec<(u64, Handler)> = {
            let registry = lock(&self.registry);
            registry
                .handlers
                .get(&topic)
                .map(|entries| entries.clone())
                .unwrap_or_default()
        };

        for (id, handler) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
                tracing::warn!(topic = %topic, subscription = id, "Event handler panicked");
            }
        }
    }

    /// Number of live subscriptions for `topic`
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        lock(&self.registry)
            .handlers
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Handle tying a registered handler to its registry entry. Dropping it
/// unsubscribes.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    topic: Topic,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock(&registry);
            if let Some(entries) = registry.handlers.get_mut(&self.topic) {
                entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// A handler panic can poison the registry mutex between the unwind and
/// our catch. The registry is a plain list either way, so keep using it.
fn lock(registry: &Mutex<Registry>) -> std::sync::MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
