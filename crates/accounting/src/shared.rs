//! Thread-safe handle around a single ledger.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::journal::{JournalDraft, JournalEntry, PostOptions};
use crate::ledger::Ledger;
use crate::period::DateRange;
use crate::sink::{NoopSink, SnapshotSink};

/// Cloneable, mutex-guarded ledger.
///
/// One writer completes a posting (balance updates, journal append and
/// snapshot save) before the next begins.
#[derive(Debug)]
pub struct SharedLedger<S = NoopSink> {
    inner: Arc<Mutex<Ledger<S>>>,
}

impl<S> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SnapshotSink> SharedLedger<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Ledger<S>>> {
        self.inner.lock().map_err(|_| LedgerError::Poisoned)
    }

    /// Run a read-only closure against the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger<S>) -> R) -> LedgerResult<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Run several operations under one lock acquisition.
    pub fn write<R>(&self, f: impl FnOnce(&mut Ledger<S>) -> LedgerResult<R>) -> LedgerResult<R> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    pub fn post_entry(
        &self,
        debit_account: &str,
        credit_account: &str,
        amount: Decimal,
        description: impl Into<String>,
        options: PostOptions,
    ) -> LedgerResult<JournalEntry> {
        self.lock()?
            .post_entry(debit_account, credit_account, amount, description, options)
    }

    pub fn post_journal(&self, draft: JournalDraft) -> LedgerResult<JournalEntry> {
        self.lock()?.post_journal(draft)
    }

    pub fn get_account_balance(&self, name: &str, range: DateRange) -> LedgerResult<Decimal> {
        self.lock()?.get_account_balance(name, range)
    }
}
