use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use crate::lifecycle::{LifecyclePolicy, ShutdownReason, ShutdownSender};
use crate::metrics::METRICS;
use crate::models::Snapshot;

pub type SubscriberId = u64;

/// Encoded snapshot, shared by every subscriber.
pub type Payload = Arc<str>;

/// Receiving half handed to a newly registered connection.
pub struct Subscription {
    pub id: SubscriberId,
    pub rx: mpsc::UnboundedReceiver<Payload>,
}

#[derive(Default)]
struct HubInner {
    next_id: SubscriberId,
    subscribers: HashMap<SubscriberId, mpsc::UnboundedSender<Payload>>,
    shutdown_issued: bool,
}

/// Registry of live push subscribers.
///
/// Registration, removal, fan-out and the zero-subscriber shutdown decision
/// all happen under one lock, so a subscriber registered before a broadcast
/// always receives it and no one can slip in between "count reached zero" and
/// "shutdown requested".
#[derive(Clone)]
pub struct SubscriptionHub {
    inner: Arc<Mutex<HubInner>>,
    policy: LifecyclePolicy,
    shutdown: ShutdownSender,
}

impl SubscriptionHub {
    pub fn new(policy: LifecyclePolicy, shutdown: ShutdownSender) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner::default())),
            policy,
            shutdown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        // nothing in the critical sections can leave the map inconsistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);

        let count = inner.subscribers.len();
        METRICS.subscribers.set(count as f64);
        info!("🔌 Subscriber {} connected ({} active)", id, count);
        Subscription { id, rx }
    }

    /// Returns whether `id` was registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut inner = self.lock();
        if inner.subscribers.remove(&id).is_none() {
            return false;
        }

        let count = inner.subscribers.len();
        METRICS.subscribers.set(count as f64);
        info!("Subscriber {} disconnected ({} active)", id, count);

        if count == 0 && self.policy.terminates_when_empty() && !inner.shutdown_issued {
            inner.shutdown_issued = true;
            info!("Last subscriber left, shutting down (use --keep-alive to stay up)");
            // receiver gone means shutdown is already under way
            let _ = self.shutdown.send(ShutdownReason::NoSubscribers);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the snapshot once and pushes it to every subscriber.
    pub fn broadcast(&self, snapshot: &Snapshot) -> Result<usize, serde_json::Error> {
        let payload: Payload = serde_json::to_string(snapshot)?.into();
        Ok(self.broadcast_payload(payload))
    }

    /// Pushes an already encoded payload. Returns how many subscribers took it;
    /// a closed subscriber is skipped.
    pub fn broadcast_payload(&self, payload: Payload) -> usize {
        let inner = self.lock();
        let mut delivered = 0;
        for (id, tx) in inner.subscribers.iter() {
            if tx.send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Subscriber {} already closed, skipping", id);
            }
        }
        METRICS.broadcasts.inc();
        debug!("Broadcast {} bytes to {} subscribers", payload.len(), delivered);
        delivered
    }
}
