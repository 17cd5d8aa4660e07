use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use tracing::trace;

use crate::{
    endpoint::{AnyBroadcast, AnySubscriber, EndpointId, Payload},
    error::TrackerError,
    subscriber::Subscriber,
};

/// The runtime object backing one named signal.
///
/// Holds non-owning references to the [`Subscriber`]s attached to it, keyed by
/// subscriber identity, and fans each emitted value out to the ones that are
/// still alive. Dead references are purged after the fan-out that finds them.
pub struct Broadcast<T> {
    observers: RwLock<HashMap<EndpointId, Weak<Subscriber<T>>>>,
}

impl<T> Broadcast<T> {
    pub(crate) fn new() -> Self { Self { observers: RwLock::new(HashMap::new()) } }

    /// Identity of a broadcast held by strong reference
    pub fn id(this: &Arc<Self>) -> EndpointId { EndpointId::of(this) }

    /// Attach a subscriber. Attaching the same subscriber twice is a no-op.
    ///
    /// # Panics
    /// If the subscriber no longer exists.
    pub fn attach(&self, subscriber: &Weak<Subscriber<T>>) {
        if let Err(e) = self.try_attach(subscriber) {
            panic!("{e}");
        }
    }

    /// Attach a subscriber, returning whether it was newly added
    pub fn try_attach(&self, subscriber: &Weak<Subscriber<T>>) -> Result<bool, TrackerError> {
        if subscriber.strong_count() == 0 {
            return Err(TrackerError::ExpiredSubscriber);
        }
        let mut observers = self.observers.write().expect("observers lock is poisoned");
        let id = EndpointId::of_weak(subscriber);
        if observers.contains_key(&id) {
            return Ok(false);
        }
        observers.insert(id, subscriber.clone());
        Ok(true)
    }

    /// Number of attached subscribers that are still alive
    pub fn observer_count(&self) -> usize {
        self.observers.read().expect("observers lock is poisoned").values().filter(|s| s.strong_count() > 0).count()
    }
}

impl<T> Broadcast<T>
where T: Clone
{
    /// Call every live subscriber once with `value`.
    ///
    /// Callbacks run without any lock held, against a snapshot of the
    /// attachments taken when the call starts. Subscribers attached during
    /// the fan-out first hear the next emission. A panic inside a callback
    /// propagates to the caller.
    pub fn emit(&self, value: T) {
        let observers: Vec<(EndpointId, Weak<Subscriber<T>>)> = {
            let observers = self.observers.read().expect("observers lock is poisoned");
            observers.iter().map(|(id, subscriber)| (*id, subscriber.clone())).collect()
        };

        let mut delivered = 0usize;
        let mut expired = Vec::new();
        // clone the value for each subscriber except the last one
        if let Some(((last_id, last), rest)) = observers.split_last() {
            for (id, subscriber) in rest {
                match subscriber.upgrade() {
                    Some(subscriber) => {
                        subscriber.call(value.clone());
                        delivered += 1;
                    }
                    None => expired.push(*id),
                }
            }
            match last.upgrade() {
                Some(subscriber) => {
                    subscriber.call(value);
                    delivered += 1;
                }
                None => expired.push(*last_id),
            }
        }
        trace!(delivered, expired = expired.len(), "Broadcast.emit");

        if !expired.is_empty() {
            let mut observers = self.observers.write().expect("observers lock is poisoned");
            for id in expired {
                observers.remove(&id);
            }
        }
    }
}

impl<T> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("payload", &std::any::type_name::<T>())
            .field("observers", &self.observers.read().expect("observers lock is poisoned").len())
            .finish()
    }
}

impl<T: 'static> AnyBroadcast for Broadcast<T> {
    fn payload(&self) -> Payload { Payload::of::<T>() }

    fn attach_any(&self, subscriber: Arc<dyn AnySubscriber>) -> Result<(), Payload> {
        let found = subscriber.payload();
        let subscriber = subscriber.into_any().downcast::<Subscriber<T>>().map_err(|_| found)?;
        self.attach(&Arc::downgrade(&subscriber));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, step: usize) -> Arc<Subscriber<()>> {
        let counter = counter.clone();
        Arc::new(Subscriber::<()>::new(Arc::new(move |_: ()| {
            counter.fetch_add(step, Ordering::SeqCst);
        })))
    }

    #[test]
    fn test_multiple_subscribers() {
        let broadcast = Broadcast::<()>::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let sub1 = counting(&counter, 1);
        let sub2 = counting(&counter, 10);
        broadcast.attach(&Arc::downgrade(&sub1));
        broadcast.attach(&Arc::downgrade(&sub2));

        broadcast.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 11);

        // Drop one subscriber - no unsubscribe step needed
        drop(sub2);

        broadcast.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 12);
        assert_eq!(broadcast.observer_count(), 1);
    }

    #[test]
    fn test_expired_purged_after_emit() {
        let broadcast = Broadcast::<()>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = counting(&counter, 1);
        broadcast.attach(&Arc::downgrade(&sub));
        drop(sub);

        // still recorded, but no longer counted as live
        assert_eq!(broadcast.observers.read().unwrap().len(), 1);
        assert_eq!(broadcast.observer_count(), 0);

        broadcast.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(broadcast.observers.read().unwrap().is_empty());
    }

    #[test]
    fn test_attach_is_identity_based() {
        let broadcast = Broadcast::<u32>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = {
            let counter = counter.clone();
            Arc::new(Subscriber::<u32>::new(Arc::new(move |n: u32| {
                counter.fetch_add(n as usize, Ordering::SeqCst);
            })))
        };

        // two distinct Weak values aliasing the same subscriber
        let first = Arc::downgrade(&sub);
        let second = Arc::downgrade(&sub);
        assert_eq!(broadcast.try_attach(&first), Ok(true));
        assert_eq!(broadcast.try_attach(&second), Ok(false));

        broadcast.emit(5);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_attach_expired_is_rejected() {
        let broadcast = Broadcast::<()>::new();
        let weak = Arc::downgrade(&counting(&Arc::new(AtomicUsize::new(0)), 1));
        assert_eq!(broadcast.try_attach(&weak), Err(TrackerError::ExpiredSubscriber));
        assert_eq!(broadcast.observer_count(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot attach an observer that no longer exists")]
    fn test_attach_expired_panics() {
        let broadcast = Broadcast::<()>::new();
        broadcast.attach(&Weak::new());
    }

    #[test]
    fn test_reentrant_attach_during_emit() {
        let broadcast = Arc::new(Broadcast::<()>::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let late = counting(&counter, 100);

        let early = {
            let broadcast = broadcast.clone();
            let late = Arc::downgrade(&late);
            let counter = counter.clone();
            Arc::new(Subscriber::<()>::new(Arc::new(move |_: ()| {
                counter.fetch_add(1, Ordering::SeqCst);
                // must not deadlock
                broadcast.attach(&late);
            })))
        };
        broadcast.attach(&Arc::downgrade(&early));

        // late subscriber joins during this pass and first hears the next one
        broadcast.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        broadcast.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 102);
    }

    #[test]
    fn test_every_live_subscriber_gets_the_value() {
        let broadcast = Broadcast::<String>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscribers: Vec<_> = (0..3)
            .map(|i| {
                let seen = seen.clone();
                Arc::new(Subscriber::<String>::new(Arc::new(move |value: String| seen.lock().unwrap().push(format!("{i}:{value}")))))
            })
            .collect();
        for subscriber in &subscribers {
            broadcast.attach(&Arc::downgrade(subscriber));
        }

        broadcast.emit("hi".to_string());

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["0:hi", "1:hi", "2:hi"]);
    }

    #[test]
    #[should_panic(expected = "subscriber failed")]
    fn test_callback_panic_propagates() {
        fn explode(_: ()) { panic!("subscriber failed") }

        let broadcast = Broadcast::<()>::new();
        let sub: Arc<Subscriber<()>> = Arc::new(Subscriber::<()>::new(Arc::new(explode)));
        broadcast.attach(&Arc::downgrade(&sub));
        broadcast.emit(());
    }

    #[test]
    fn test_attach_any_checks_payload() {
        let broadcast = Broadcast::<i32>::new();
        let right: Arc<Subscriber<i32>> = Arc::new(Subscriber::<i32>::new(Arc::new(|_: i32| {})));
        let wrong: Arc<Subscriber<String>> = Arc::new(Subscriber::<String>::new(Arc::new(|_: String| {})));

        assert!(broadcast.attach_any(right.clone()).is_ok());
        let found = broadcast.attach_any(wrong.clone()).unwrap_err();
        assert_eq!(found, Payload::of::<String>());
        assert_eq!(broadcast.observer_count(), 1);
    }
}
