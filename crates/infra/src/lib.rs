//! Infrastructure layer: configuration, snapshot persistence, bootstrap.

pub mod bootstrap;
pub mod config;
pub mod read_model;
pub mod snapshot;

pub use bootstrap::{ConfiguredSink, init_observability, open_ledger};
pub use config::{AppConfig, ConfigError};
pub use read_model::{InMemorySnapshotStore, SnapshotStore, StoreSink};
pub use snapshot::{JsonFileSink, SnapshotError, load_snapshot, load_snapshot_or_default};
