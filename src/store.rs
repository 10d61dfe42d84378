//! Observable stores with a single writer.
//!
//! Each piece of shared state lives behind one [`StoreWriter`], owned by the
//! coordinator responsible for it. Everyone else gets a [`StoreReader`].
//! Both read the current value at call time; nothing hands out snapshots that
//! could go stale inside a long-lived closure.
//!
//! Backed by `tokio::sync::watch`, so observers can also `await` changes.

use tokio::sync::watch;

/// Create a store and return its only writer.
pub fn new_store<T>(name: &'static str, initial: T) -> StoreWriter<T> {
    let (tx, _rx) = watch::channel(initial);
    StoreWriter { name, tx }
}

/// Write access to a store. Deliberately not `Clone`.
#[derive(Debug)]
pub struct StoreWriter<T> {
    name: &'static str,
    tx: watch::Sender<T>,
}

impl<T> StoreWriter<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mutate the value in place.
    ///
    /// The closure returns whether it changed anything; observers are only
    /// woken when it did. Returns the same flag.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = self.tx.send_if_modified(f);
        if changed {
            log::trace!("store '{}' updated", self.name);
        }
        changed
    }

    /// Read the current value. Do not call `update` from inside `f`.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> StoreReader<T> {
        StoreReader {
            name: self.name,
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of a store.
#[derive(Debug, Clone)]
pub struct StoreReader<T> {
    name: &'static str,
    rx: watch::Receiver<T>,
}

impl<T> StoreReader<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.rx.borrow())
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. Returns false once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
