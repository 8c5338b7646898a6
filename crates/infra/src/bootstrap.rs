//! Wiring a configured ledger.

use tracing::info;

use tallybook_accounting::{Ledger, LedgerStore, SnapshotSink};

use crate::config::AppConfig;
use crate::snapshot::{JsonFileSink, SnapshotError, load_snapshot_or_default};

/// Sink selected by [`AppConfig::snapshot_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfiguredSink {
    Memory,
    File(JsonFileSink),
}

impl SnapshotSink for ConfiguredSink {
    fn save(&mut self, store: &LedgerStore) -> anyhow::Result<()> {
        match self {
            Self::Memory => Ok(()),
            Self::File(sink) => sink.save(store),
        }
    }
}

/// Install the process-wide subscriber in the configured format.
pub fn init_observability(config: &AppConfig) -> bool {
    tallybook_observability::init_with(config.log_format, "info")
}

/// Open the ledger described by `config`, resuming from its snapshot file
/// when one exists.
pub fn open_ledger(config: &AppConfig) -> Result<Ledger<ConfiguredSink>, SnapshotError> {
    let (store, sink) = match &config.snapshot_path {
        Some(path) => (
            load_snapshot_or_default(path)?,
            ConfiguredSink::File(JsonFileSink::new(path)),
        ),
        None => (LedgerStore::new(), ConfiguredSink::Memory),
    };

    let ledger = Ledger::from_store(store, sink, config.ledger_options());
    info!(
        ledger_id = %ledger.id(),
        accounts = ledger.accounts().len(),
        entries = ledger.journal().len(),
        persistent = config.snapshot_path.is_some(),
        "ledger opened"
    );
    Ok(ledger)
}
