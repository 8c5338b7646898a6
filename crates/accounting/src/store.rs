//! Ledger state: chart of accounts + journal.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tallybook_core::{AccountId, EntryId, error::require_text};

use crate::account::Account;
use crate::error::{LedgerError, LedgerResult, checked_sum};
use crate::event::LedgerEvent;
use crate::journal::{JournalEntry, JournalLine};
use crate::period::DateRange;

/// Serialized form of a [`LedgerStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub journal: Vec<JournalEntry>,
}

/// Explicit ledger state handed to every operation.
///
/// Accounts keep their insertion order; name and id lookups are O(1) through
/// hash indexes that are rebuilt (and the whole snapshot re-validated) on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LedgerSnapshot", into = "LedgerSnapshot")]
pub struct LedgerStore {
    accounts: Vec<Account>,
    journal: Vec<JournalEntry>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<AccountId, usize>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Exact, case-sensitive lookup by account name.
    pub fn lookup_account(&self, name: &str) -> Option<&Account> {
        self.by_name.get(name).map(|&idx| &self.accounts[idx])
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id).map(|&idx| &self.accounts[idx])
    }

    pub fn entry(&self, id: EntryId) -> Option<&JournalEntry> {
        self.journal.iter().find(|e| e.id_typed() == id)
    }

    /// Opening balance plus activity inside `range`.
    pub fn account_balance(&self, name: &str, range: DateRange) -> LedgerResult<Decimal> {
        let account = self
            .lookup_account(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))?;
        self.balance_of(account, range)
    }

    pub fn balance_of(&self, account: &Account, range: DateRange) -> LedgerResult<Decimal> {
        account
            .opening
            .checked_add(self.activity(account.id, range)?)
            .ok_or_else(|| LedgerError::overflow(format!("balance of {}", account.name)))
    }

    /// Σ(debit - credit) over the account's lines in entries dated inside `range`.
    pub fn activity(&self, account_id: AccountId, range: DateRange) -> LedgerResult<Decimal> {
        if range.is_empty() {
            return Ok(Decimal::ZERO);
        }
        checked_sum(
            self.journal
                .iter()
                .filter(|e| range.contains(e.date()))
                .flat_map(|e| e.lines_for(account_id))
                .map(JournalLine::net),
            || format!("activity of account {account_id}"),
        )
    }

    /// Re-derive every cached balance from the journal and re-check every entry.
    pub fn verify_integrity(&self) -> LedgerResult<()> {
        let mut derived: HashMap<AccountId, Decimal> =
            self.accounts.iter().map(|a| (a.id, a.opening)).collect();

        for entry in &self.journal {
            entry.check().map_err(|e| {
                LedgerError::CorruptSnapshot(format!("entry {}: {e}", entry.id_typed()))
            })?;
            for line in entry.lines() {
                let total = derived.get_mut(&line.account_id()).ok_or_else(|| {
                    LedgerError::CorruptSnapshot(format!(
                        "entry {} references unknown account {}",
                        entry.id_typed(),
                        line.account_id()
                    ))
                })?;
                *total = total.checked_add(line.net()).ok_or_else(|| {
                    LedgerError::CorruptSnapshot(format!(
                        "balance of account {} overflows",
                        line.account_id()
                    ))
                })?;
            }
        }

        for account in &self.accounts {
            let expected = derived[&account.id];
            if account.balance != expected {
                return Err(LedgerError::CorruptSnapshot(format!(
                    "account {} has balance {} but its journal implies {}",
                    account.name, account.balance, expected
                )));
            }
        }
        Ok(())
    }

    /// Evolve state from a single, already-validated event.
    ///
    /// A posting whose balances would overflow, or lose precision, is refused
    /// before anything changes.
    pub(crate) fn apply(&mut self, event: &LedgerEvent) -> LedgerResult<()> {
        match event {
            LedgerEvent::AccountOpened(e) => self.index(e.account.clone()),
            LedgerEvent::EntryPosted(e) => {
                for (idx, balance) in self.posted_balances(&e.entry)? {
                    self.accounts[idx].balance = balance;
                }
                self.journal.push(e.entry.clone());
            }
            LedgerEvent::AccountDeactivated(e) => self.set_active(e.account_id, false),
            LedgerEvent::AccountReactivated(e) => self.set_active(e.account_id, true),
        }
        Ok(())
    }

    /// New balance of every account the entry touches.
    fn posted_balances(&self, entry: &JournalEntry) -> LedgerResult<HashMap<usize, Decimal>> {
        let mut next: HashMap<usize, Decimal> = HashMap::new();
        for line in entry.lines() {
            let Some(&idx) = self.by_id.get(&line.account_id()) else {
                continue;
            };
            let account = &self.accounts[idx];
            let current = next.get(&idx).copied().unwrap_or(account.balance);
            let updated = current
                .checked_add(line.net())
                .ok_or_else(|| LedgerError::overflow(format!("balance of {}", account.name)))?;
            // Exact, so reverting gives back the previous balance.
            if updated.checked_sub(current) != Some(line.net())
                || updated.checked_sub(line.net()) != Some(current)
            {
                return Err(LedgerError::overflow(format!(
                    "precision of the balance of {}",
                    account.name
                )));
            }
            next.insert(idx, updated);
        }
        Ok(next)
    }

    /// Undo the most recently applied event.
    pub(crate) fn revert(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::AccountOpened(e) => {
                if self.accounts.last().map(|a| a.id) == Some(e.account.id) {
                    self.accounts.pop();
                    self.by_name.remove(&e.account.name);
                    self.by_id.remove(&e.account.id);
                }
            }
            LedgerEvent::EntryPosted(e) => {
                if self.journal.last().map(|j| j.id_typed()) == Some(e.entry.id_typed()) {
                    self.journal.pop();
                    // Exact: `apply` refused postings it could not undo.
                    for line in e.entry.lines() {
                        if let Some(&idx) = self.by_id.get(&line.account_id()) {
                            self.accounts[idx].balance -= line.net();
                        }
                    }
                }
            }
            LedgerEvent::AccountDeactivated(e) => self.set_active(e.account_id, true),
            LedgerEvent::AccountReactivated(e) => self.set_active(e.account_id, false),
        }
    }

    fn index(&mut self, account: Account) {
        let idx = self.accounts.len();
        self.by_name.insert(account.name.clone(), idx);
        self.by_id.insert(account.id, idx);
        self.accounts.push(account);
    }

    fn set_active(&mut self, id: AccountId, active: bool) {
        if let Some(&idx) = self.by_id.get(&id) {
            self.accounts[idx].active = active;
        }
    }
}

impl From<LedgerStore> for LedgerSnapshot {
    fn from(store: LedgerStore) -> Self {
        Self {
            accounts: store.accounts,
            journal: store.journal,
        }
    }
}

impl TryFrom<LedgerSnapshot> for LedgerStore {
    type Error = LedgerError;

    fn try_from(snapshot: LedgerSnapshot) -> LedgerResult<Self> {
        let mut store = LedgerStore {
            accounts: Vec::with_capacity(snapshot.accounts.len()),
            journal: snapshot.journal,
            by_name: HashMap::with_capacity(snapshot.accounts.len()),
            by_id: HashMap::with_capacity(snapshot.accounts.len()),
        };

        for account in snapshot.accounts {
            require_text("account name", &account.name)?;
            if store.by_name.contains_key(&account.name) {
                return Err(LedgerError::DuplicateAccount(account.name));
            }
            if store.by_id.contains_key(&account.id) {
                return Err(LedgerError::CorruptSnapshot(format!(
                    "duplicate account id {}",
                    account.id
                )));
            }
            store.index(account);
        }

        store.verify_integrity()?;
        Ok(store)
    }
}
