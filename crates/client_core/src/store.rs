//! Observable state container shared by the orchestrators.

use tokio::sync::watch;

/// Single-writer state cell. The owning orchestrator mutates it through
/// [`Store::update`]; everyone else reads snapshots or subscribes.
pub struct Store<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Applies `apply` atomically. Subscribers are only notified when the
    /// state actually changed.
    pub(crate) fn update<R: Default>(&self, apply: impl FnOnce(&mut T) -> R) -> R {
        let mut output = R::default();
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            output = apply(state);
            *state != before
        });
        output
    }
}
