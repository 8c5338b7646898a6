use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tallybook_core::AccountId;
use tallybook_events::Event;

use crate::account::Account;
use crate::journal::JournalEntry;

/// Event: AccountOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub account: Account,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EntryPosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPosted {
    pub entry: JournalEntry,
    pub occurred_at: DateTime<Utc>,
}

/// Event: account deactivated or reactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatusChanged {
    pub account_id: AccountId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Every change the ledger can make to its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    AccountOpened(AccountOpened),
    EntryPosted(EntryPosted),
    AccountDeactivated(AccountStatusChanged),
    AccountReactivated(AccountStatusChanged),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::AccountOpened(_) => "ledger.account.opened",
            LedgerEvent::EntryPosted(_) => "ledger.entry.posted",
            LedgerEvent::AccountDeactivated(_) => "ledger.account.deactivated",
            LedgerEvent::AccountReactivated(_) => "ledger.account.reactivated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::AccountOpened(e) => e.occurred_at,
            LedgerEvent::EntryPosted(e) => e.occurred_at,
            LedgerEvent::AccountDeactivated(e) | LedgerEvent::AccountReactivated(e) => {
                e.occurred_at
            }
        }
    }
}
