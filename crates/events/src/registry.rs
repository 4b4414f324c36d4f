//! Registry of connected real-time subscribers.
//!
//! Each subscriber gets a bounded outbound queue. The registry keeps the sending
//! half; the connection owns the receiving half inside a [`Subscription`].
//! Dropping the subscription (client disconnect) unregisters it.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};
use std::task::{Context, Poll};

use catalog_core::ConnectionId;
use tokio::sync::mpsc;
use tokio_stream::Stream;

use crate::change::ChangeEvent;

/// Default per-subscriber queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Identifies one registered connection. Cheap to copy; carries no resources.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberHandle {
    id: ConnectionId,
}

impl SubscriberHandle {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Receiving side of a registered connection.
///
/// Yields change events in publish order. Ends when the subscriber is
/// unregistered (dropped as slow, or the registry was closed).
#[derive(Debug)]
pub struct Subscription {
    handle: SubscriberHandle,
    receiver: mpsc::Receiver<ChangeEvent>,
    registry: Weak<SubscriberRegistry>,
}

impl Subscription {
    pub fn handle(&self) -> SubscriberHandle {
        self.handle
    }

    /// Wait for the next event. `None` once the subscriber is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Result<ChangeEvent, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }
}

impl Stream for Subscription {
    type Item = ChangeEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(&self.handle);
        }
    }
}

/// Concurrent-safe set of fan-out targets.
#[derive(Debug)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<ConnectionId, mpsc::Sender<ChangeEvent>>>,
    queue_capacity: usize,
    closed: AtomicBool,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// A capacity of 0 is bumped to 1.
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Register a new connection.
    ///
    /// After [`close_all`](Self::close_all) the returned subscription is already
    /// finished: it is not registered and yields nothing.
    pub fn register(self: &Arc<Self>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let handle = SubscriberHandle { id: ConnectionId::new() };

        if self.closed.load(Ordering::Acquire) {
            drop(tx);
        } else {
            let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
            subs.insert(handle.id, tx);
            tracing::debug!(connection_id = %handle.id, subscribers = subs.len(), "subscriber registered");
        }

        Subscription {
            handle,
            receiver: rx,
            registry: Arc::downgrade(self),
        }
    }

    /// Remove a connection. Returns whether it was registered; repeated calls are no-ops.
    pub fn unregister(&self, handle: &SubscriberHandle) -> bool {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        let removed = subs.remove(&handle.id).is_some();
        if removed {
            tracing::debug!(connection_id = %handle.id, subscribers = subs.len(), "subscriber unregistered");
        }
        removed
    }

    pub fn contains(&self, handle: &SubscriberHandle) -> bool {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subs.contains_key(&handle.id)
    }

    pub fn len(&self) -> usize {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable copy of the current fan-out targets.
    ///
    /// Broadcasts iterate this copy, so concurrent connects/disconnects never
    /// disturb an in-flight fan-out.
    pub fn snapshot(&self) -> Vec<(SubscriberHandle, mpsc::Sender<ChangeEvent>)> {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subs.iter()
            .map(|(id, tx)| (SubscriberHandle { id: *id }, tx.clone()))
            .collect()
    }

    /// Teardown: drop every queue sender so each open stream terminates, and
    /// refuse further registrations.
    pub fn close_all(&self) {
        self.closed.store(true, Ordering::Release);
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        let count = subs.len();
        subs.clear();
        tracing::info!(closed = count, "subscriber registry closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
