/*!
Named signals and observers that never keep each other alive.

An object that wants to emit or hear events embeds a [`Tracker`] plus any
number of [`Signal`] and [`Observer`] fields. Each field mints its endpoint
through the tracker and is that endpoint's only strong owner; trackers and
connected peers hold `Weak` references only. Dropping an object therefore
disconnects it everywhere, with no unsubscribe step: broadcasts skip and purge
dead observers on the next emit, and trackers prune dead names on the next
mint or connect.

# Design requirements:
- A tracker's entries are lookup aids, never owners
- Observers are attached by identity, so attaching one twice delivers once
- Removal of dead observers happens after a fan-out, never during it
- Cloning an object must not clone its connections - a cloned [`Tracker`] is empty,
  and `Signal` / `Observer` are not `Clone`
- Precondition violations (empty callback, unknown name, mismatched payload type)
  panic; every such call has a `try_*` twin that returns [`TrackerError`] instead

# Basic usage

```rust
use signal_tracker::*;

struct Door {
    tracker: Tracker,
    opened: Signal<u32>,
}

impl Door {
    fn new() -> Self {
        let tracker = Tracker::new();
        let opened = Signal::new(&tracker, "opened");
        Self { tracker, opened }
    }
}

// A copy gets its own, unconnected signal
impl Clone for Door {
    fn clone(&self) -> Self { Self::new() }
}

struct Bell {
    tracker: Tracker,
    _ring: Observer<u32>,
}

impl Bell {
    fn new() -> Self {
        let tracker = Tracker::new();
        let ring = Observer::new(&tracker, "opened", |times: u32| println!("ding x{times}"));
        Self { tracker, _ring: ring }
    }
}

let door = Door::new();
{
    let bell = Bell::new();
    bell.tracker.connect("opened", "opened", &door.tracker);
    door.opened.emit(1); // ding x1
    door.clone().opened.emit(2); // nothing, the copy has no observers
}
// the bell is gone, so this reaches nobody
door.opened.emit(3);
```
*/

mod broadcast;
mod callback;
mod config;
mod endpoint;
mod error;
mod observer;
mod signal;
mod subscriber;
mod tracker;

pub use broadcast::*;
pub use callback::*;
pub use config::*;
pub use endpoint::EndpointId;
pub use error::*;
pub use observer::*;
pub use signal::*;
pub use subscriber::*;
pub use tracker::*;
