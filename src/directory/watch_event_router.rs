use std::sync::{Arc, RwLock};

/// Callback invoked after the watched file changes. Boxed so that
/// `Directory::watch` can be called with any closure.
pub type WatchCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Dropping this handle deregisters the associated callback. Held by an
/// `IndexReader` configured for `ReloadPolicy::OnCommit`.
pub struct WatchHandle {
    _routed: Arc<WatchCallback>,
}

impl WatchHandle {
    pub fn empty() -> WatchHandle {
        WatchHandle {
            _routed: Arc::new(Box::new(|| {})),
        }
    }
}

/// Fan-out router shared by directory implementations that do support
/// real filesystem notifications (`MmapDirectory`): every registered
/// callback is invoked once per underlying change event.
#[derive(Default)]
pub struct WatchEventRouter {
    callbacks: RwLock<Vec<Arc<WatchCallback>>>,
}

impl WatchEventRouter {
    pub fn new() -> WatchEventRouter {
        WatchEventRouter::default()
    }

    pub fn subscribe(&self, callback: WatchCallback) -> WatchHandle {
        let routed = Arc::new(callback);
        self.callbacks.write().unwrap().push(Arc::clone(&routed));
        WatchHandle { _routed: routed }
    }

    pub fn broadcast(&self) {
        for callback in self.callbacks.read().unwrap().iter() {
            (callback)();
        }
    }
}
