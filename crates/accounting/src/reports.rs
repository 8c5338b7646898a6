//! Read-only financial reports derived from the journal.
//!
//! Engine balances are debit-positive. Statements present each account on its
//! normal side (see [`AccountKind::normal_balance`]), so a credit-heavy income
//! account shows up as a positive revenue figure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tallybook_core::{AccountId, EntryId};

use crate::account::{Account, AccountKind};
use crate::error::{LedgerError, LedgerResult, checked_sum};
use crate::ledger::Ledger;
use crate::period::DateRange;
use crate::sink::SnapshotSink;
use crate::store::LedgerStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    pub range: DateRange,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl TrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}

/// One posting in an account's ledger card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerLine {
    pub entry_id: EntryId,
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLedger {
    pub account_id: AccountId,
    pub name: String,
    /// Opening balance plus everything dated before the range.
    pub brought_forward: Decimal,
    pub lines: Vec<LedgerLine>,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeStatement {
    pub range: DateRange,
    pub income: Vec<StatementRow>,
    pub expenses: Vec<StatementRow>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    pub as_of: NaiveDate,
    pub assets: Vec<StatementRow>,
    pub liabilities: Vec<StatementRow>,
    pub equity: Vec<StatementRow>,
    /// Income minus expense not yet closed into retained earnings.
    pub current_earnings: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    /// Equity rows plus `current_earnings`.
    pub total_equity: Decimal,
}

impl BalanceSheet {
    pub fn is_balanced(&self) -> bool {
        self.total_liabilities.checked_add(self.total_equity) == Some(self.total_assets)
    }
}

fn row(account: &Account, amount: Decimal) -> StatementRow {
    StatementRow {
        account_id: account.id_typed(),
        code: account.code().to_string(),
        name: account.name().to_string(),
        amount,
    }
}

fn total(rows: &[StatementRow], section: &str) -> LedgerResult<Decimal> {
    checked_sum(rows.iter().map(|r| r.amount), || format!("{section} total"))
}

impl LedgerStore {
    /// Every account's balance over `range`, split into debit and credit columns.
    pub fn trial_balance(&self, range: DateRange) -> LedgerResult<TrialBalance> {
        let rows = self
            .accounts()
            .iter()
            .map(|a| {
                let balance = self.balance_of(a, range)?;
                Ok(TrialBalanceRow {
                    account_id: a.id_typed(),
                    code: a.code().to_string(),
                    name: a.name().to_string(),
                    kind: a.kind(),
                    debit: balance.max(Decimal::ZERO),
                    credit: (-balance).max(Decimal::ZERO),
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(TrialBalance {
            range,
            total_debit: checked_sum(rows.iter().map(|r| r.debit), || "total debit".to_string())?,
            total_credit: checked_sum(rows.iter().map(|r| r.credit), || {
                "total credit".to_string()
            })?,
            rows,
        })
    }

    /// Chronological postings for one account with a running balance.
    pub fn account_ledger(&self, name: &str, range: DateRange) -> LedgerResult<AccountLedger> {
        let account = self
            .lookup_account(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))?;
        let id = account.id_typed();

        let brought_forward = match range.before() {
            Some(before) => self.balance_of(account, before)?,
            None => account.opening(),
        };

        let mut entries: Vec<_> = if range.is_empty() {
            Vec::new()
        } else {
            self.journal()
                .iter()
                .filter(|e| range.contains(e.date()))
                .collect()
        };
        // Entry ids are time-ordered, so same-day entries stay in posting order.
        entries.sort_by_key(|e| (e.date(), e.id_typed()));

        let mut running = brought_forward;
        let mut lines = Vec::new();
        for entry in entries {
            for line in entry.lines_for(id) {
                running = running
                    .checked_add(line.net())
                    .ok_or_else(|| LedgerError::overflow(format!("running balance of {name}")))?;
                lines.push(LedgerLine {
                    entry_id: entry.id_typed(),
                    date: entry.date(),
                    reference: entry.reference().to_string(),
                    description: entry.description().to_string(),
                    debit: line.debit_amount(),
                    credit: line.credit_amount(),
                    running_balance: running,
                });
            }
        }

        Ok(AccountLedger {
            account_id: id,
            name: account.name().to_string(),
            brought_forward,
            lines,
            closing_balance: running,
        })
    }

    /// Revenue and expense activity inside `range` (opening balances excluded).
    pub fn income_statement(&self, range: DateRange) -> LedgerResult<IncomeStatement> {
        let mut income = Vec::new();
        let mut expenses = Vec::new();
        for account in self.accounts() {
            let target = match account.kind() {
                AccountKind::Income => &mut income,
                AccountKind::Expense => &mut expenses,
                _ => continue,
            };
            let activity = self.activity(account.id_typed(), range)?;
            target.push(row(account, account.kind().normal_balance().present(activity)));
        }

        let total_income = total(&income, "income")?;
        let total_expense = total(&expenses, "expense")?;
        Ok(IncomeStatement {
            range,
            income,
            expenses,
            total_income,
            total_expense,
            net_income: total_income
                .checked_sub(total_expense)
                .ok_or_else(|| LedgerError::overflow("net income"))?,
        })
    }

    /// Position as of the end of `as_of`, each section on its normal side.
    pub fn balance_sheet(&self, as_of: NaiveDate) -> LedgerResult<BalanceSheet> {
        let range = DateRange::until(as_of);
        let mut assets = Vec::new();
        let mut liabilities = Vec::new();
        let mut equity = Vec::new();
        let mut earnings = Vec::new();

        for account in self.accounts() {
            let balance = self.balance_of(account, range)?;
            match account.kind() {
                AccountKind::Asset => assets.push(row(account, balance)),
                AccountKind::Liability => liabilities.push(row(account, -balance)),
                AccountKind::Equity => equity.push(row(account, -balance)),
                AccountKind::Income | AccountKind::Expense => earnings.push(-balance),
            }
        }

        let current_earnings = checked_sum(earnings, || "current earnings".to_string())?;
        let total_assets = total(&assets, "asset")?;
        let total_liabilities = total(&liabilities, "liability")?;
        let total_equity = total(&equity, "equity")?
            .checked_add(current_earnings)
            .ok_or_else(|| LedgerError::overflow("equity total"))?;
        Ok(BalanceSheet {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            total_assets,
            total_liabilities,
            total_equity,
        })
    }
}

impl<S: SnapshotSink> Ledger<S> {
    pub fn trial_balance(&self, range: DateRange) -> LedgerResult<TrialBalance> {
        self.store().trial_balance(range)
    }

    pub fn account_ledger(&self, name: &str, range: DateRange) -> LedgerResult<AccountLedger> {
        self.store().account_ledger(name, range)
    }

    pub fn income_statement(&self, range: DateRange) -> LedgerResult<IncomeStatement> {
        self.store().income_statement(range)
    }

    pub fn balance_sheet(&self, as_of: NaiveDate) -> LedgerResult<BalanceSheet> {
        self.store().balance_sheet(as_of)
    }
}
