use std::sync::Arc;

use crate::{callback::IntoCallback, endpoint::EndpointId, error::TrackerError, signal::Signal, subscriber::Subscriber, tracker::Tracker};

/// A named observer callback, embedded as a field of the object that listens.
///
/// The handle is the sole strong owner of its [`Subscriber`]. Every signal it
/// is connected to holds only a `Weak` reference, so dropping the handle (or
/// the object that embeds it) stops delivery without an unsubscribe step.
/// Like [`Signal`], it is not `Clone`.
pub struct Observer<T> {
    name: String,
    subscriber: Arc<Subscriber<T>>,
}

impl<T: 'static> Observer<T> {
    /// Mint a subscriber named `name` on `tracker`, wrapping `callback`.
    ///
    /// # Panics
    /// If `callback` is empty, or under [`NameReuse::Reject`](crate::NameReuse::Reject)
    /// if the name is held by a live observer.
    pub fn new(tracker: &Tracker, name: impl Into<String>, callback: impl IntoCallback<T>) -> Self {
        let name = name.into();
        let subscriber = tracker.mint_subscriber(&name, callback);
        Self { name, subscriber }
    }

    pub fn try_new(tracker: &Tracker, name: impl Into<String>, callback: impl IntoCallback<T>) -> Result<Self, TrackerError> {
        let name = name.into();
        let subscriber = tracker.try_mint_subscriber(&name, callback)?;
        Ok(Self { name, subscriber })
    }

    /// Rebind to a freshly minted subscriber. Signals connected to the old one stop reaching this handle.
    pub fn reset(&mut self, tracker: &Tracker, name: impl Into<String>, callback: impl IntoCallback<T>) {
        if let Err(e) = self.try_reset(tracker, name, callback) {
            panic!("{e}");
        }
    }

    pub fn try_reset(&mut self, tracker: &Tracker, name: impl Into<String>, callback: impl IntoCallback<T>) -> Result<(), TrackerError> {
        let name = name.into();
        self.subscriber = tracker.remint_subscriber(&name, callback, (&self.name, self.id()))?;
        self.name = name;
        Ok(())
    }
}

impl<T> Observer<T> {
    /// Attach directly to `signal`, without going through either tracker
    pub fn connect(&self, signal: &Signal<T>) { signal.attach(&Arc::downgrade(&self.subscriber)) }

    pub fn name(&self) -> &str { &self.name }

    pub fn id(&self) -> EndpointId { Subscriber::id(&self.subscriber) }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").field("name", &self.name).field("subscriber", &self.subscriber).finish()
    }
}
