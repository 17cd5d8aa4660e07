use std::sync::{Arc, Weak};

use crate::{broadcast::Broadcast, endpoint::EndpointId, error::TrackerError, subscriber::Subscriber, tracker::Tracker};

/// A named signal, embedded as a field of the object that emits it.
///
/// The handle is the sole strong owner of its [`Broadcast`]; the tracker it was
/// minted from only knows it by name. Dropping the handle makes every
/// connection to it inert. `Signal` is deliberately not `Clone`: an object
/// that implements `Clone` should build a fresh `Signal` for the copy, which
/// starts out with no observers.
///
/// ```
/// use signal_tracker::{Observer, Signal, Tracker};
///
/// let tracker = Tracker::new();
/// let done: Signal<i32> = Signal::new(&tracker, "done");
/// let heard = Observer::new(&tracker, "heard", |n: i32| println!("heard {n}"));
///
/// heard.connect(&done);
/// done.emit(1); // prints "heard 1"
/// ```
pub struct Signal<T> {
    name: String,
    broadcast: Arc<Broadcast<T>>,
}

impl<T: 'static> Signal<T> {
    /// Mint a broadcast named `name` on `tracker`.
    ///
    /// # Panics
    /// Only under [`NameReuse::Reject`](crate::NameReuse::Reject), if the name is held by a live signal.
    pub fn new(tracker: &Tracker, name: impl Into<String>) -> Self {
        let name = name.into();
        let broadcast = tracker.mint_broadcast(&name);
        Self { name, broadcast }
    }

    pub fn try_new(tracker: &Tracker, name: impl Into<String>) -> Result<Self, TrackerError> {
        let name = name.into();
        let broadcast = tracker.try_mint_broadcast(&name)?;
        Ok(Self { name, broadcast })
    }

    /// Rebind to a freshly minted broadcast. Every observer attached to the
    /// old one is dropped along with it.
    pub fn reset(&mut self, tracker: &Tracker, name: impl Into<String>) {
        if let Err(e) = self.try_reset(tracker, name) {
            panic!("{e}");
        }
    }

    pub fn try_reset(&mut self, tracker: &Tracker, name: impl Into<String>) -> Result<(), TrackerError> {
        let name = name.into();
        self.broadcast = tracker.remint_broadcast(&name, (&self.name, self.id()))?;
        self.name = name;
        Ok(())
    }
}

impl<T> Signal<T> {
    pub fn name(&self) -> &str { &self.name }

    pub fn id(&self) -> EndpointId { Broadcast::id(&self.broadcast) }

    /// Number of live observers attached to this signal
    pub fn observer_count(&self) -> usize { self.broadcast.observer_count() }

    pub(crate) fn attach(&self, subscriber: &Weak<Subscriber<T>>) { self.broadcast.attach(subscriber) }
}

impl<T: Clone> Signal<T> {
    pub fn emit(&self, value: T) { self.broadcast.emit(value) }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("name", &self.name).field("broadcast", &self.broadcast).finish()
    }
}
