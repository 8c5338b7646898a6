//! General ledger (double-entry bookkeeping).
//!
//! Pure domain logic: the only side effect is the injected [`SnapshotSink`]
//! save after each change.

pub mod account;
pub mod closing;
pub mod error;
pub mod event;
pub mod journal;
pub mod ledger;
pub mod opening;
pub mod options;
pub mod period;
pub mod reconciliation;
pub mod reports;
pub mod shared;
pub mod sink;
pub mod store;

pub use account::{Account, AccountKind, NewAccount, NormalBalance};
pub use closing::CLOSING_REFERENCE;
pub use error::{LedgerError, LedgerResult};
pub use event::{AccountOpened, AccountStatusChanged, EntryPosted, LedgerEvent};
pub use journal::{DraftLine, JournalDraft, JournalEntry, JournalLine, PostOptions};
pub use ledger::Ledger;
pub use opening::OPENING_REFERENCE;
pub use options::{LedgerOptions, MissingAccountPolicy};
pub use period::DateRange;
pub use reconciliation::{Reconciliation, UnclearedLine};
pub use reports::{
    AccountLedger, BalanceSheet, IncomeStatement, LedgerLine, StatementRow, TrialBalance,
    TrialBalanceRow,
};
pub use shared::SharedLedger;
pub use sink::{NoopSink, SnapshotSink};
pub use store::{LedgerSnapshot, LedgerStore};
