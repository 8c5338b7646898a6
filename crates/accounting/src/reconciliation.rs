//! Matching a bank or cash account against an external statement.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tallybook_core::{AccountId, EntryId};

use crate::account::AccountKind;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::period::DateRange;
use crate::sink::SnapshotSink;
use crate::store::LedgerStore;

/// A posting the statement has not yet cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclearedLine {
    pub entry_id: EntryId,
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    /// Debit-positive effect on the account.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub account_id: AccountId,
    pub name: String,
    pub statement_balance: Decimal,
    /// Opening balance plus every cleared posting.
    pub cleared_balance: Decimal,
    pub book_balance: Decimal,
    pub uncleared: Vec<UnclearedLine>,
    /// `statement_balance - cleared_balance`.
    pub difference: Decimal,
}

impl Reconciliation {
    pub fn is_reconciled(&self) -> bool {
        self.difference.is_zero()
    }
}

impl LedgerStore {
    /// Compare `account` with a statement that has cleared the entries in
    /// `reconciled`. Read-only.
    pub fn reconcile(
        &self,
        account: &str,
        statement_balance: Decimal,
        reconciled: &[EntryId],
    ) -> LedgerResult<Reconciliation> {
        let target = self
            .lookup_account(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;
        if target.kind() != AccountKind::Asset {
            return Err(LedgerError::InvalidEntry(format!(
                "{account} is a {} account; only bank and cash accounts reconcile",
                target.kind()
            )));
        }
        let id = target.id_typed();

        let cleared: HashSet<EntryId> = reconciled.iter().copied().collect();
        for entry_id in &cleared {
            let entry = self
                .entry(*entry_id)
                .ok_or(LedgerError::EntryNotFound(*entry_id))?;
            if entry.lines_for(id).next().is_none() {
                return Err(LedgerError::InvalidEntry(format!(
                    "entry {} does not touch {account}",
                    entry.reference()
                )));
            }
        }

        let mut cleared_balance = target.opening();
        let mut uncleared = Vec::new();
        for entry in self.journal() {
            let is_cleared = cleared.contains(&entry.id_typed());
            for line in entry.lines_for(id) {
                if is_cleared {
                    cleared_balance = cleared_balance
                        .checked_add(line.net())
                        .ok_or_else(|| LedgerError::overflow(format!("cleared balance of {account}")))?;
                } else {
                    uncleared.push(UnclearedLine {
                        entry_id: entry.id_typed(),
                        date: entry.date(),
                        reference: entry.reference().to_string(),
                        description: entry.description().to_string(),
                        amount: line.net(),
                    });
                }
            }
        }
        uncleared.sort_by_key(|l| (l.date, l.entry_id));

        Ok(Reconciliation {
            account_id: id,
            name: target.name().to_string(),
            statement_balance,
            cleared_balance,
            book_balance: self.balance_of(target, DateRange::all())?,
            uncleared,
            difference: statement_balance
                .checked_sub(cleared_balance)
                .ok_or_else(|| LedgerError::overflow("reconciliation difference"))?,
        })
    }
}

impl<S: SnapshotSink> Ledger<S> {
    pub fn reconcile(
        &self,
        account: &str,
        statement_balance: Decimal,
        reconciled: &[EntryId],
    ) -> LedgerResult<Reconciliation> {
        self.store().reconcile(account, statement_balance, reconciled)
    }
}
