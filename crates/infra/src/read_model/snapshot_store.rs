use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tallybook_accounting::{LedgerStore, SnapshotSink};
use tallybook_core::LedgerId;

use crate::snapshot::SnapshotError;

/// Ledger snapshots keyed by ledger id.
///
/// Every method reports a store that can no longer be trusted (for example a
/// poisoned lock) as an error rather than as an empty result.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, ledger_id: LedgerId) -> Result<Option<LedgerStore>, SnapshotError>;
    fn put(&self, ledger_id: LedgerId, store: LedgerStore) -> Result<(), SnapshotError>;
    fn ids(&self) -> Result<Vec<LedgerId>, SnapshotError>;
    /// Removing an absent id is not an error.
    fn remove(&self, ledger_id: LedgerId) -> Result<(), SnapshotError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn get(&self, ledger_id: LedgerId) -> Result<Option<LedgerStore>, SnapshotError> {
        (**self).get(ledger_id)
    }

    fn put(&self, ledger_id: LedgerId, store: LedgerStore) -> Result<(), SnapshotError> {
        (**self).put(ledger_id, store)
    }

    fn ids(&self) -> Result<Vec<LedgerId>, SnapshotError> {
        (**self).ids()
    }

    fn remove(&self, ledger_id: LedgerId) -> Result<(), SnapshotError> {
        (**self).remove(ledger_id)
    }
}

/// In-memory snapshot store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    inner: RwLock<HashMap<LedgerId, LedgerStore>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<LedgerId, LedgerStore>>, SnapshotError> {
        self.inner.read().map_err(|_| SnapshotError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<LedgerId, LedgerStore>>, SnapshotError> {
        self.inner.write().map_err(|_| SnapshotError::Poisoned)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get(&self, ledger_id: LedgerId) -> Result<Option<LedgerStore>, SnapshotError> {
        Ok(self.read()?.get(&ledger_id).cloned())
    }

    fn put(&self, ledger_id: LedgerId, store: LedgerStore) -> Result<(), SnapshotError> {
        self.write()?.insert(ledger_id, store);
        Ok(())
    }

    fn ids(&self) -> Result<Vec<LedgerId>, SnapshotError> {
        Ok(self.read()?.keys().copied().collect())
    }

    fn remove(&self, ledger_id: LedgerId) -> Result<(), SnapshotError> {
        self.write()?.remove(&ledger_id);
        Ok(())
    }
}

/// Adapts a [`SnapshotStore`] slot into the engine's save callback.
#[derive(Debug, Clone)]
pub struct StoreSink<T> {
    store: T,
    ledger_id: LedgerId,
}

impl<T: SnapshotStore> StoreSink<T> {
    pub fn new(store: T, ledger_id: LedgerId) -> Self {
        Self { store, ledger_id }
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }
}

impl<T: SnapshotStore> SnapshotSink for StoreSink<T> {
    fn save(&mut self, store: &LedgerStore) -> anyhow::Result<()> {
        self.store.put(self.ledger_id, store.clone())?;
        Ok(())
    }
}
