use std::any::Any;
use std::sync::Arc;

use crate::{
    callback::Callback,
    endpoint::{AnySubscriber, EndpointId, Payload},
};

/// The runtime object backing one named observer callback.
///
/// A subscriber is nothing more than a durable address for "this particular
/// callback": broadcasts only ever hold `Weak` references to it, so it may be
/// attached to any number of them at once and stops receiving as soon as its
/// owning [`Observer`](crate::Observer) is dropped.
pub struct Subscriber<T> {
    callback: Callback<T>,
}

impl<T> Subscriber<T> {
    // minted only through a Tracker, which has already rejected empty callables
    pub(crate) fn new(callback: Callback<T>) -> Self { Self { callback } }

    /// Call the stored callback
    pub fn call(&self, value: T) { (self.callback)(value) }

    /// Identity of a subscriber held by strong reference
    pub fn id(this: &Arc<Self>) -> EndpointId { EndpointId::of(this) }
}

impl<T> std::fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("payload", &std::any::type_name::<T>()).finish()
    }
}

impl<T: 'static> AnySubscriber for Subscriber<T> {
    fn payload(&self) -> Payload { Payload::of::<T>() }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> { self }
}
