//! Published provider state with a post-unmount guard.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Holds a provider's state and publishes every replacement to subscribers.
///
/// After `unmount`, publication is a no-op so completions of in-flight
/// operations cannot touch state a view has already torn down.
pub(crate) struct StateCell<S> {
    tx: watch::Sender<S>,
    mounted: AtomicBool,
}

impl<S> StateCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            mounted: AtomicBool::new(true),
        }
    }

    /// Applies `modify` atomically and notifies subscribers.
    ///
    /// Returns `false` without applying anything once unmounted.
    pub(crate) fn publish(&self, modify: impl FnOnce(&mut S)) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.tx.send_modify(modify);
        true
    }

    pub(crate) fn read<T>(&self, read: impl FnOnce(&S) -> T) -> T {
        read(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub(crate) fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}
