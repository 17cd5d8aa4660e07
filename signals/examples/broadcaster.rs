//! Walks through the basic connection patterns with debug logging enabled.
//!
//! ```sh
//! RUST_LOG=signal_tracker=debug cargo run -p signal-tracker --example broadcaster
//! ```

use signal_tracker::{Observer, Signal, Tracker};
use tracing::info;

struct Worker {
    tracker: Tracker,
    did_something: Signal<i32>,
}

impl Worker {
    fn new() -> Self {
        let tracker = Tracker::new();
        let did_something = Signal::new(&tracker, "something_done");
        Self { tracker, did_something }
    }

    fn do_something(&self, thing: i32) {
        info!("worker is doing something: {thing}");
        self.did_something.emit(thing);
    }
}

impl Clone for Worker {
    fn clone(&self) -> Self { Self::new() }
}

struct Watcher {
    tracker: Tracker,
    _something_done: Observer<i32>,
}

impl Watcher {
    fn new(label: &'static str) -> Self {
        let tracker = Tracker::new();
        let something_done = Observer::new(&tracker, "something_done", move |thing: i32| {
            info!("{label}: someone was heard doing something: {thing}");
        });
        Self { tracker, _something_done: something_done }
    }

    fn watch(&self, worker: &Worker) { self.tracker.connect("something_done", "something_done", &worker.tracker) }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let worker = Worker::new();

    info!("no watchers");
    worker.do_something(0);

    info!("one watcher");
    {
        let watcher = Watcher::new("solo");
        watcher.watch(&worker);
        worker.do_something(1);
    }

    info!("watcher dropped");
    worker.do_something(2);

    info!("five watchers");
    {
        let watchers: Vec<Watcher> = (0..5).map(|_| Watcher::new("crowd")).collect();
        for watcher in &watchers {
            watcher.watch(&worker);
        }
        worker.do_something(3);
    }

    info!("one watcher, five workers");
    {
        let workers: Vec<Worker> = (0..5).map(|_| Worker::new()).collect();
        let watcher = Watcher::new("busy");
        for w in &workers {
            watcher.watch(w);
        }
        for w in &workers {
            w.do_something(4);
        }
    }

    info!("copied worker");
    {
        let watcher = Watcher::new("original only");
        watcher.watch(&worker);
        let copy = worker.clone();
        worker.do_something(5);
        copy.do_something(5);
    }
}
