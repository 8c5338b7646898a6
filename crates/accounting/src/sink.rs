//! Persistence collaborator.
//!
//! The engine never talks to storage itself. After each in-memory change it
//! hands the full store to a [`SnapshotSink`]; if the sink fails, the change
//! is rolled back.

use crate::store::LedgerStore;

pub trait SnapshotSink {
    fn save(&mut self, store: &LedgerStore) -> anyhow::Result<()>;
}

/// Sink for purely in-memory ledgers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn save(&mut self, _store: &LedgerStore) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Any `save(state)` callback is a sink.
impl<F> SnapshotSink for F
where
    F: FnMut(&LedgerStore) -> anyhow::Result<()>,
{
    fn save(&mut self, store: &LedgerStore) -> anyhow::Result<()> {
        self(store)
    }
}
