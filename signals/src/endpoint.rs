use std::any::{Any, TypeId};
use std::sync::Arc;

/// A unique identifier for a minted endpoint that cannot be forged.
///
/// Derived from the address of the endpoint's allocation. The allocation is
/// reserved until every `Arc` and `Weak` pointing at it is dropped, so an id
/// stored next to a `Weak` is never handed to a different endpoint.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EndpointId(usize);

impl EndpointId {
    pub(crate) fn of<E: ?Sized>(endpoint: &Arc<E>) -> Self { Self(Arc::as_ptr(endpoint) as *const () as usize) }

    pub(crate) fn of_weak<E: ?Sized>(endpoint: &std::sync::Weak<E>) -> Self { Self(endpoint.as_ptr() as *const () as usize) }
}

impl From<EndpointId> for usize {
    fn from(id: EndpointId) -> usize { id.0 }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Runtime tag for the payload type an endpoint carries
#[derive(Debug, Clone, Copy)]
pub(crate) struct Payload {
    id: TypeId,
    pub(crate) name: &'static str,
}

impl Payload {
    pub(crate) fn of<T: 'static>() -> Self { Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() } }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

/// Type-erased view of a `Broadcast<T>`, as stored by a tracker
pub(crate) trait AnyBroadcast: Send + Sync {
    fn payload(&self) -> Payload;

    /// Attach a subscriber carrying the same payload type.
    /// Hands back the subscriber's payload tag if it does not match.
    fn attach_any(&self, subscriber: Arc<dyn AnySubscriber>) -> Result<(), Payload>;
}

/// Type-erased view of a `Subscriber<T>`, as stored by a tracker
pub(crate) trait AnySubscriber: Send + Sync {
    fn payload(&self) -> Payload;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}
