//! JSON file persistence for ledger snapshots.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use tallybook_accounting::{LedgerStore, SnapshotSink};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed JSON, or a snapshot that fails ledger validation.
    #[error("invalid snapshot {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot store lock poisoned")]
    Poisoned,
}

impl SnapshotError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn format(path: &Path, source: serde_json::Error) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes the whole store as pretty JSON after every change.
///
/// Each save goes to a sibling `*.tmp` file that is then renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, store: &LedgerStore) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
        }

        let json =
            serde_json::to_vec_pretty(store).map_err(|e| SnapshotError::format(&self.path, e))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| SnapshotError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SnapshotError::io(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            accounts = store.accounts().len(),
            entries = store.journal().len(),
            "snapshot written"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotSink for JsonFileSink {
    fn save(&mut self, store: &LedgerStore) -> anyhow::Result<()> {
        Ok(self.write(store)?)
    }
}

/// Read and validate a snapshot written by [`JsonFileSink`].
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<LedgerStore, SnapshotError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| SnapshotError::format(path, e))
}

/// Like [`load_snapshot`], but a missing file yields an empty store.
pub fn load_snapshot_or_default(path: impl AsRef<Path>) -> Result<LedgerStore, SnapshotError> {
    match load_snapshot(path.as_ref()) {
        Err(SnapshotError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(LedgerStore::default())
        }
        other => other,
    }
}
