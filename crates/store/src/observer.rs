//! Change notifications.
//!
//! Stores publish an event after every successful mutation. The presentation
//! layer subscribes with a closure and re-reads whatever it renders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives events of type `E`.
///
/// Implemented for any `Fn(&E) + Send + Sync` closure.
pub trait Observer<E>: Send + Sync {
    fn notify(&self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn notify(&self, event: &E) {
        self(event);
    }
}

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A list of subscribers for one event type.
pub struct Observers<E> {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Arc<dyn Observer<E>>)>>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<E> Observers<E> {
    /// Add a subscriber.
    pub fn subscribe(&self, observer: Arc<dyn Observer<E>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Number of current subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every subscriber.
    ///
    /// The subscriber list is copied first so an observer may read the store
    /// or subscribe further observers while being notified.
    pub fn notify(&self, event: &E) {
        let subscribers: Vec<Arc<dyn Observer<E>>> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in subscribers {
            observer.notify(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_reaches_all_subscribers() {
        let observers: Observers<u32> = Observers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        observers.subscribe(Arc::new(move |event: &u32| {
            first.lock().unwrap_or_else(PoisonError::into_inner).push(("first", *event));
        }));
        let second = Arc::clone(&seen);
        observers.subscribe(Arc::new(move |event: &u32| {
            second.lock().unwrap_or_else(PoisonError::into_inner).push(("second", *event));
        }));

        observers.notify(&7);

        let seen = seen.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(*seen, vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let observers: Observers<u32> = Observers::default();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let id = observers.subscribe(Arc::new(move |_: &u32| {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        observers.notify(&1);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&2);

        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert!(observers.is_empty());
    }
}
