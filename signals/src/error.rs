use thiserror::Error;

/// Which side of a connection an endpoint sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Signal,
    Observer,
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointKind::Signal => write!(f, "signal"),
            EndpointKind::Observer => write!(f, "observer"),
        }
    }
}

/// Precondition violations reported by trackers, endpoints and handles.
///
/// These all indicate a programming error in the embedding code. The panicking
/// entry points (`connect`, `Observer::new`, ...) abort with the same message;
/// the `try_*` variants hand the error back instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("empty callback is not allowed (observer {name:?})")]
    EmptyCallback { name: String },
    #[error("no signal named {name:?} found on the other tracker")]
    UnknownSignal { name: String },
    #[error("no observer named {name:?} present on this tracker")]
    UnknownObserver { name: String },
    #[error("cannot attach an observer that no longer exists")]
    ExpiredSubscriber,
    #[error("signal {signal:?} carries {expected} but observer {observer:?} expects {found}")]
    SignatureMismatch { signal: String, observer: String, expected: &'static str, found: &'static str },
    #[error("{kind} name {name:?} is already in use by a live endpoint")]
    NameInUse { kind: EndpointKind, name: String },
}
