use std::sync::Arc;

/// The callable stored by a [`Subscriber`](crate::Subscriber)
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// Trait for types that can be converted into an observer callback.
///
/// Returns `None` for an empty callable, which minting refuses.
pub trait IntoCallback<T> {
    fn into_callback(self) -> Option<Callback<T>>;
}

impl<F, T> IntoCallback<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_callback(self) -> Option<Callback<T>> { Some(Arc::new(self)) }
}

impl<T> IntoCallback<T> for Arc<dyn Fn(T) + Send + Sync + 'static> {
    fn into_callback(self) -> Option<Callback<T>> { Some(self) }
}

// `None` stands in for an absent callable
impl<T, C> IntoCallback<T> for Option<C>
where C: IntoCallback<T>
{
    fn into_callback(self) -> Option<Callback<T>> { self.and_then(IntoCallback::into_callback) }
}

impl<T> IntoCallback<T> for std::sync::mpsc::Sender<T>
where T: Send + 'static
{
    fn into_callback(self) -> Option<Callback<T>> {
        // Sender is Sync as of 1.72
        Some(Arc::new(move |value| {
            let _ = self.send(value); // Ignore send errors
        }))
    }
}

#[cfg(feature = "tokio")]
impl<T> IntoCallback<T> for tokio::sync::mpsc::UnboundedSender<T>
where T: Send + 'static
{
    fn into_callback(self) -> Option<Callback<T>> {
        Some(Arc::new(move |value| {
            let _ = self.send(value); // Ignore send errors
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn closure_is_never_empty() {
        let hits = Arc::new(AtomicUsize::new(0));
        let callback: Callback<usize> = {
            let hits = hits.clone();
            IntoCallback::<usize>::into_callback(move |n: usize| {
                hits.fetch_add(n, Ordering::SeqCst);
            })
            .unwrap()
        };
        callback(3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn none_is_empty() {
        let missing: Option<fn(i32)> = None;
        assert!(IntoCallback::<i32>::into_callback(missing).is_none());
        assert!(IntoCallback::<i32>::into_callback(Some(|_: i32| {})).is_some());
    }

    #[test]
    fn std_sender_forwards() {
        let (tx, rx) = std::sync::mpsc::channel::<&str>();
        let callback: Callback<&str> = IntoCallback::<&str>::into_callback(tx).unwrap();
        callback("hello");
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }
}
