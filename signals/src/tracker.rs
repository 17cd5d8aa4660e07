use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use tracing::{debug, warn};

use crate::{
    broadcast::Broadcast,
    callback::IntoCallback,
    config::{NameReuse, TrackerConfig},
    endpoint::{AnyBroadcast, AnySubscriber, EndpointId},
    error::{EndpointKind, TrackerError},
    subscriber::Subscriber,
};

/// Per-object table of named endpoints.
///
/// A tracker mints the [`Broadcast`]s and [`Subscriber`]s behind an object's
/// [`Signal`](crate::Signal) and [`Observer`](crate::Observer) fields and keeps
/// only `Weak` references to them, so it never extends their lifetime. Entries
/// whose endpoint is gone are treated as absent on lookup and pruned after
/// every mint and connect.
///
/// Cloning a tracker yields an empty one with the same configuration: an
/// object's clone must mint its own endpoints rather than inherit the
/// original's connections.
pub struct Tracker {
    entries: RwLock<Entries>,
    config: TrackerConfig,
}

#[derive(Default)]
struct Entries {
    signals: HashMap<String, Weak<dyn AnyBroadcast>>,
    observers: HashMap<String, Weak<dyn AnySubscriber>>,
}

impl Entries {
    /// Drop every entry whose endpoint no longer exists, returning how many were removed
    fn sweep(&mut self) -> usize {
        let before = self.signals.len() + self.observers.len();
        self.signals.retain(|_, signal| signal.strong_count() > 0);
        self.observers.retain(|_, observer| observer.strong_count() > 0);
        let removed = before - (self.signals.len() + self.observers.len());
        if removed > 0 {
            debug!(removed, "Tracker garbage collection");
        }
        removed
    }
}

impl Default for Tracker {
    fn default() -> Self { Self::new() }
}

impl Clone for Tracker {
    fn clone(&self) -> Self { Self::with_config(self.config) }
}

impl Tracker {
    pub fn new() -> Self { Self::with_config(TrackerConfig::default()) }

    pub fn with_config(config: TrackerConfig) -> Self { Self { entries: RwLock::new(Entries::default()), config } }

    pub fn config(&self) -> &TrackerConfig { &self.config }

    /// Mint a new broadcast under `name` and hand back its only strong reference.
    ///
    /// # Panics
    /// Only under [`NameReuse::Reject`], if `name` still refers to a live broadcast.
    pub fn mint_broadcast<T: 'static>(&self, name: &str) -> Arc<Broadcast<T>> {
        self.try_mint_broadcast(name).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_mint_broadcast<T: 'static>(&self, name: &str) -> Result<Arc<Broadcast<T>>, TrackerError> {
        self.mint_broadcast_replacing(name, None)
    }

    /// Mint a broadcast that takes over from `previous` (a name and the id it was minted with).
    /// The previous entry is released only once the new one is in place, and never counts as reuse.
    pub(crate) fn remint_broadcast<T: 'static>(&self, name: &str, previous: (&str, EndpointId)) -> Result<Arc<Broadcast<T>>, TrackerError> {
        self.mint_broadcast_replacing(name, Some(previous))
    }

    fn mint_broadcast_replacing<T: 'static>(&self, name: &str, previous: Option<(&str, EndpointId)>) -> Result<Arc<Broadcast<T>>, TrackerError> {
        let broadcast = Arc::new(Broadcast::<T>::new());
        let erased: Arc<dyn AnyBroadcast> = broadcast.clone();
        {
            let mut entries = self.entries.write().expect("entries lock is poisoned");
            self.insert_entry(&mut entries.signals, EndpointKind::Signal, name, Arc::downgrade(&erased), previous)?;
            entries.sweep();
        }
        debug!("Tracker minted signal {name:?} ({})", std::any::type_name::<T>());
        Ok(broadcast)
    }

    /// Mint a new subscriber wrapping `callback` under `name` and hand back its only strong reference.
    ///
    /// # Panics
    /// If `callback` is empty, or under [`NameReuse::Reject`] if `name` still refers to a live subscriber.
    pub fn mint_subscriber<T: 'static>(&self, name: &str, callback: impl IntoCallback<T>) -> Arc<Subscriber<T>> {
        self.try_mint_subscriber(name, callback).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_mint_subscriber<T: 'static>(&self, name: &str, callback: impl IntoCallback<T>) -> Result<Arc<Subscriber<T>>, TrackerError> {
        self.mint_subscriber_replacing(name, callback, None)
    }

    /// Mint a subscriber that takes over from `previous`, as [`Tracker::remint_broadcast`] does for broadcasts
    pub(crate) fn remint_subscriber<T: 'static>(
        &self,
        name: &str,
        callback: impl IntoCallback<T>,
        previous: (&str, EndpointId),
    ) -> Result<Arc<Subscriber<T>>, TrackerError> {
        self.mint_subscriber_replacing(name, callback, Some(previous))
    }

    fn mint_subscriber_replacing<T: 'static>(
        &self,
        name: &str,
        callback: impl IntoCallback<T>,
        previous: Option<(&str, EndpointId)>,
    ) -> Result<Arc<Subscriber<T>>, TrackerError> {
        let callback = callback.into_callback().ok_or_else(|| TrackerError::EmptyCallback { name: name.to_owned() })?;
        let subscriber = Arc::new(Subscriber::new(callback));
        let erased: Arc<dyn AnySubscriber> = subscriber.clone();
        {
            let mut entries = self.entries.write().expect("entries lock is poisoned");
            self.insert_entry(&mut entries.observers, EndpointKind::Observer, name, Arc::downgrade(&erased), previous)?;
            entries.sweep();
        }
        debug!("Tracker minted observer {name:?} ({})", std::any::type_name::<T>());
        Ok(subscriber)
    }

    /// Attach our observer `our_observer` to the signal `their_signal` of `other`.
    ///
    /// `other` may be this same tracker.
    ///
    /// # Panics
    /// If either name does not currently resolve to a live endpoint, or if the
    /// two endpoints carry different payload types.
    pub fn connect(&self, their_signal: &str, our_observer: &str, other: &Tracker) {
        if let Err(e) = self.try_connect(their_signal, our_observer, other) {
            panic!("{e}");
        }
    }

    pub fn try_connect(&self, their_signal: &str, our_observer: &str, other: &Tracker) -> Result<(), TrackerError> {
        let broadcast = other.lookup_signal(their_signal).ok_or_else(|| TrackerError::UnknownSignal { name: their_signal.to_owned() })?;
        let subscriber =
            self.lookup_observer(our_observer).ok_or_else(|| TrackerError::UnknownObserver { name: our_observer.to_owned() })?;

        broadcast.attach_any(subscriber).map_err(|found| TrackerError::SignatureMismatch {
            signal: their_signal.to_owned(),
            observer: our_observer.to_owned(),
            expected: broadcast.payload().name,
            found: found.name,
        })?;
        debug!("Tracker connected observer {our_observer:?} to signal {their_signal:?}");

        self.collect_garbage();
        Ok(())
    }

    /// Prune entries whose endpoint no longer exists. Returns the number of entries removed.
    pub fn collect_garbage(&self) -> usize { self.entries.write().expect("entries lock is poisoned").sweep() }

    /// Names of the signals that currently resolve, sorted
    pub fn signal_names(&self) -> Vec<String> {
        let entries = self.entries.read().expect("entries lock is poisoned");
        let mut names: Vec<String> = entries.signals.iter().filter(|(_, s)| s.strong_count() > 0).map(|(n, _)| n.clone()).collect();
        names.sort();
        names
    }

    /// Names of the observers that currently resolve, sorted
    pub fn observer_names(&self) -> Vec<String> {
        let entries = self.entries.read().expect("entries lock is poisoned");
        let mut names: Vec<String> = entries.observers.iter().filter(|(_, o)| o.strong_count() > 0).map(|(n, _)| n.clone()).collect();
        names.sort();
        names
    }

    pub fn has_signal(&self, name: &str) -> bool { self.lookup_signal(name).is_some() }

    pub fn has_observer(&self, name: &str) -> bool { self.lookup_observer(name).is_some() }

    fn lookup_signal(&self, name: &str) -> Option<Arc<dyn AnyBroadcast>> {
        self.entries.read().expect("entries lock is poisoned").signals.get(name).and_then(Weak::upgrade)
    }

    fn lookup_observer(&self, name: &str) -> Option<Arc<dyn AnySubscriber>> {
        self.entries.read().expect("entries lock is poisoned").observers.get(name).and_then(Weak::upgrade)
    }

    fn insert_entry<E: ?Sized>(
        &self,
        table: &mut HashMap<String, Weak<E>>,
        kind: EndpointKind,
        name: &str,
        endpoint: Weak<E>,
        previous: Option<(&str, EndpointId)>,
    ) -> Result<(), TrackerError> {
        let is_previous = |entry: &Weak<E>| matches!(previous, Some((_, id)) if EndpointId::of_weak(entry) == id);
        let live = table.get(name).is_some_and(|entry| entry.strong_count() > 0 && !is_previous(entry));
        if live {
            match self.config.name_reuse {
                NameReuse::Overwrite => {}
                NameReuse::Warn => {
                    warn!("Tracker: {kind} {name:?} minted again while the previous one is alive; the old one is no longer reachable by name")
                }
                NameReuse::Reject => return Err(TrackerError::NameInUse { kind, name: name.to_owned() }),
            }
        }
        if let Some((previous_name, _)) = previous {
            if table.get(previous_name).is_some_and(is_previous) {
                table.remove(previous_name);
            }
        }
        table.insert(name.to_owned(), endpoint);
        Ok(())
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker").field("signals", &self.signal_names()).field("observers", &self.observer_names()).finish()
    }
}
