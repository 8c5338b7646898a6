use rust_decimal::Decimal;
use thiserror::Error;

use tallybook_core::{AmountError, DomainError, EntryId};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger engine failures.
///
/// Every failing operation leaves the ledger exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("unbalanced entry: debits {debits} != credits {credits}")]
    UnbalancedEntry { debits: Decimal, credits: Decimal },

    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error("account is inactive: {0}")]
    AccountInactive(String),

    #[error("invalid journal entry: {0}")]
    InvalidEntry(String),

    #[error("journal entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("corrupt ledger snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("failed to persist ledger: {0}")]
    Persistence(String),

    #[error("ledger lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LedgerError {
    /// A sum or balance that no longer fits in a `Decimal`.
    pub(crate) fn overflow(what: impl core::fmt::Display) -> Self {
        LedgerError::InvalidAmount(AmountError::OutOfRange(format!(
            "{what} exceeds the decimal range"
        )))
    }
}

/// Overflow-checked sum.
pub(crate) fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    what: impl FnOnce() -> String,
) -> LedgerResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| LedgerError::overflow(what()))
}
