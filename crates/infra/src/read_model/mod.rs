//! Keyed in-memory snapshot storage.

pub mod snapshot_store;

pub use snapshot_store::{InMemorySnapshotStore, SnapshotStore, StoreSink};
