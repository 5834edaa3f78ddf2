//! The [`EventChannel`] broker.
//!
//! Handlers are keyed by the exact Rust type of the event they accept.
//! Publishing an `E` runs every handler subscribed to `E`, in subscription
//! order, before `publish` returns. Nothing is queued and nothing fans out
//! to other types.

use std::any::{Any, TypeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::trace;

use crate::event::Event;

type ErasedHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw subscription number.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

struct Subscriber {
    id: SubscriptionId,
    handler: ErasedHandler,
}

#[derive(Default)]
struct Inner {
    handlers: DashMap<TypeId, Vec<Subscriber>>,
    next_id: AtomicU64,
}

/// A synchronous publish/subscribe broker.
///
/// Cloning produces another handle to the same subscriber table, so every
/// system can hold one without any of them owning the others.
///
/// The handler list for a type is copied at the start of each publish. A
/// handler may therefore publish further events or subscribe new handlers;
/// handlers added during a publish first run on the next one.
#[derive(Clone, Default)]
pub struct EventChannel {
    inner: Arc<Inner>,
}

impl EventChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`.
    pub fn subscribe<E, F>(&self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: ErasedHandler = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.inner
            .handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Subscriber { id, handler });
        trace!(
            event = std::any::type_name::<E>(),
            subscription = id.0,
            "subscribed"
        );
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        for mut entry in self.inner.handlers.iter_mut() {
            let subscribers = entry.value_mut();
            if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
                subscribers.remove(pos);
                trace!(subscription = id.0, "unsubscribed");
                return true;
            }
        }
        false
    }

    /// Deliver `event` to every current subscriber of `E` and then drop it.
    ///
    /// Returns the number of handlers that ran.
    pub fn publish<E: Event>(&self, event: E) -> usize {
        let handlers: Vec<ErasedHandler> = match self.inner.handlers.get(&TypeId::of::<E>()) {
            Some(subscribers) => subscribers
                .iter()
                .map(|s| Arc::clone(&s.handler))
                .collect(),
            None => Vec::new(),
        };

        for handler in &handlers {
            handler(&event as &dyn Any);
        }

        trace!(
            event = std::any::type_name::<E>(),
            handlers = handlers.len(),
            "published"
        );
        handlers.len()
    }

    /// Number of handlers currently subscribed to `E`.
    #[must_use]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .handlers
            .get(&TypeId::of::<E>())
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Number of handlers across all event types.
    #[must_use]
    pub fn total_subscribers(&self) -> usize {
        self.inner
            .handlers
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.inner.handlers.clear();
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("event_types", &self.inner.handlers.len())
            .field("subscribers", &self.total_subscribers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Moved {
        entity: u64,
        x: f32,
    }

    #[derive(Debug)]
    struct Spawned(u64);

    #[test]
    fn test_publish_without_subscribers() {
        let channel = EventChannel::new();
        assert_eq!(channel.publish(Spawned(1)), 0);
    }

    #[test]
    fn test_handlers_run_before_publish_returns() {
        let channel = EventChannel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        channel.subscribe(move |e: &Moved| sink.lock().unwrap().push(e.clone()));

        let ran = channel.publish(Moved { entity: 1, x: 5.0 });

        assert_eq!(ran, 1);
        assert_eq!(*seen.lock().unwrap(), vec![Moved { entity: 1, x: 5.0 }]);
    }

    #[test]
    fn test_subscription_order_is_delivery_order() {
        let channel = EventChannel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..4 {
            let order = Arc::clone(&order);
            channel.subscribe(move |_: &Spawned| order.lock().unwrap().push(tag));
        }

        channel.publish(Spawned(1));
        channel.publish(Spawned(2));

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_exact_type_dispatch_only() {
        let channel = EventChannel::new();
        let moved = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&moved);
        channel.subscribe(move |_: &Moved| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(channel.publish(Spawned(3)), 0);
        assert_eq!(moved.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let channel = EventChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = channel.subscribe(move |_: &Spawned| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.publish(Spawned(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(channel.subscriber_count::<Spawned>(), 0);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let channel = EventChannel::new();
        let other = channel.clone();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        other.subscribe(move |_: &Spawned| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        channel.publish(Spawned(1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(channel.total_subscribers(), 1);
    }

    #[test]
    fn test_handler_may_publish_and_subscribe() {
        let channel = EventChannel::new();
        let spawned = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&spawned);
        channel.subscribe(move |_: &Spawned| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let nested = channel.clone();
        channel.subscribe(move |e: &Moved| {
            nested.publish(Spawned(e.entity));
            nested.subscribe(|_: &Moved| {});
        });

        assert_eq!(channel.publish(Moved { entity: 2, x: 0.0 }), 1);
        assert_eq!(spawned.load(Ordering::SeqCst), 1);
        // The handler added during the first publish only runs from now on.
        assert_eq!(channel.publish(Moved { entity: 2, x: 0.0 }), 2);
    }

    #[test]
    fn test_clear() {
        let channel = EventChannel::new();
        channel.subscribe(|_: &Spawned| {});
        channel.subscribe(|_: &Moved| {});
        assert_eq!(channel.total_subscribers(), 2);
        channel.clear();
        assert_eq!(channel.total_subscribers(), 0);
    }
}
