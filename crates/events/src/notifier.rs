//! Change publication (fan-out to connected subscribers).
//!
//! Publishing is fire-and-forget:
//!
//! - **Best-effort, at-most-once**: each subscriber registered at publish time gets
//!   at most one copy; nothing is retried or replayed.
//! - **Per-subscriber FIFO**: a subscriber sees events in publish order.
//! - **Never blocks**: delivery is a `try_send` into the subscriber's bounded queue.
//!   A full queue (slow consumer) or a closed one (gone consumer) counts as a
//!   disconnect and the subscriber is unregistered.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use crate::change::ChangeEvent;
use crate::registry::SubscriberRegistry;

/// Sink for committed catalog changes.
///
/// Implementations must not block the caller and must not report delivery
/// failures back to it.
pub trait ChangeNotifier: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

impl<N> ChangeNotifier for Arc<N>
where
    N: ChangeNotifier + ?Sized,
{
    fn publish(&self, event: ChangeEvent) {
        (**self).publish(event)
    }
}

/// Delivers each change to every subscriber in a [`SubscriberRegistry`].
#[derive(Debug, Clone)]
pub struct FanoutNotifier {
    registry: Arc<SubscriberRegistry>,
}

impl FanoutNotifier {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }
}

impl ChangeNotifier for FanoutNotifier {
    fn publish(&self, event: ChangeEvent) {
        let targets = self.registry.snapshot();
        let mut delivered = 0usize;

        for (handle, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %handle.id(),
                        "subscriber queue full; dropping slow subscriber"
                    );
                    self.registry.unregister(&handle);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %handle.id(), "subscriber gone; unregistering");
                    self.registry.unregister(&handle);
                }
            }
        }

        tracing::debug!(
            event_type = event.event_type(),
            product_id = %event.product_id(),
            delivered,
            "change published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeKind;
    use catalog_core::ProductId;
    use chrono::Utc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn deleted() -> ChangeEvent {
        ChangeEvent::deleted(ProductId::new(), Utc::now())
    }

    fn setup(capacity: usize) -> (Arc<SubscriberRegistry>, FanoutNotifier) {
        let registry = Arc::new(SubscriberRegistry::with_queue_capacity(capacity));
        let notifier = FanoutNotifier::new(registry.clone());
        (registry, notifier)
    }

    #[test]
    fn every_subscriber_gets_exactly_one_copy() {
        let (registry, notifier) = setup(8);
        let mut a = registry.register();
        let mut b = registry.register();

        let event = deleted();
        notifier.publish(event.clone());

        assert_eq!(a.try_recv().unwrap(), event);
        assert_eq!(b.try_recv().unwrap(), event);
        assert_eq!(a.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(b.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let (registry, notifier) = setup(64);
        let mut sub = registry.register();

        let events: Vec<_> = (0..20).map(|_| deleted()).collect();
        for e in &events {
            notifier.publish(e.clone());
        }

        let received: Vec<_> = (0..20).map(|_| sub.try_recv().unwrap()).collect();
        assert_eq!(received, events);
    }

    #[test]
    fn late_subscriber_only_sees_later_events() {
        let (registry, notifier) = setup(16);
        for _ in 0..3 {
            notifier.publish(deleted());
        }

        let mut late = registry.register();
        let after = deleted();
        notifier.publish(after.clone());

        assert_eq!(late.try_recv().unwrap(), after);
        assert_eq!(late.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn slow_subscriber_is_dropped_without_affecting_others() {
        let (registry, notifier) = setup(2);
        let slow = registry.register();
        let mut fast = registry.register();

        for _ in 0..3 {
            notifier.publish(deleted());
            while fast.try_recv().is_ok() {}
        }

        assert!(!registry.contains(&slow.handle()));
        assert!(registry.contains(&fast.handle()));

        let e = deleted();
        notifier.publish(e.clone());
        assert_eq!(fast.try_recv().unwrap(), e);
    }

    #[test]
    fn dropped_slow_subscriber_drains_then_ends() {
        let (registry, notifier) = setup(1);
        let mut slow = registry.register();

        notifier.publish(deleted());
        notifier.publish(deleted());

        assert!(slow.try_recv().is_ok());
        assert_eq!(slow.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let (registry, notifier) = setup(4);
        notifier.publish(deleted());
        assert!(registry.is_empty());
    }

    #[test]
    fn arc_wrapped_notifier_publishes() {
        let (registry, notifier) = setup(4);
        let shared: Arc<dyn ChangeNotifier> = Arc::new(notifier);
        let mut sub = registry.register();

        shared.publish(deleted());
        assert_eq!(sub.try_recv().unwrap().kind(), ChangeKind::Deleted);
    }

    #[tokio::test]
    async fn subscription_is_a_stream() {
        use tokio_stream::StreamExt;

        let (registry, notifier) = setup(4);
        let mut sub = registry.register();
        let e = deleted();
        notifier.publish(e.clone());

        assert_eq!(sub.next().await, Some(e));
    }
}
