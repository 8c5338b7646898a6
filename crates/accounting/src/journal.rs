use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tallybook_core::{AccountId, Amount, Entity, EntryId};

use crate::error::{LedgerError, LedgerResult};

/// One side of a journal entry (immutable).
///
/// Exactly one of `debit` / `credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    account_id: AccountId,
    debit: Amount,
    credit: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
}

impl JournalLine {
    pub fn debit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Amount::ZERO,
            memo: None,
        }
    }

    pub fn credit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            debit: Amount::ZERO,
            credit: amount,
            memo: None,
        }
    }

    /// Unchecked pair of sides; validated when the entry is assembled.
    pub(crate) fn from_sides(account_id: AccountId, debit: Amount, credit: Amount) -> Self {
        Self {
            account_id,
            debit,
            credit,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo;
        self
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn debit_amount(&self) -> Decimal {
        self.debit.value()
    }

    pub fn credit_amount(&self) -> Decimal {
        self.credit.value()
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Signed effect on the account's debit-positive balance.
    pub fn net(&self) -> Decimal {
        self.debit.value() - self.credit.value()
    }

    /// Same account and amount on the opposite side.
    pub fn reversed(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            memo: self.memo.clone(),
        }
    }

    pub(crate) fn check_sides(&self) -> LedgerResult<()> {
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, true) | (true, false) => Ok(()),
            (true, true) => Err(LedgerError::InvalidEntry(format!(
                "line for account {} has neither a debit nor a credit",
                self.account_id
            ))),
            (false, false) => Err(LedgerError::InvalidEntry(format!(
                "line for account {} has both a debit and a credit",
                self.account_id
            ))),
        }
    }
}

/// A posted double-entry transaction. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    id: EntryId,
    date: NaiveDate,
    reference: String,
    description: String,
    lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Validates shape and balance before constructing the entry.
    pub(crate) fn balanced(
        date: NaiveDate,
        reference: String,
        description: String,
        lines: Vec<JournalLine>,
    ) -> LedgerResult<Self> {
        let entry = Self {
            id: EntryId::new(),
            date,
            reference,
            description,
            lines,
        };
        entry.check()?;
        Ok(entry)
    }

    pub(crate) fn check(&self) -> LedgerResult<()> {
        if self.lines.len() < 2 {
            return Err(LedgerError::InvalidEntry(format!(
                "journal entry needs at least two lines, got {}",
                self.lines.len()
            )));
        }
        for line in &self.lines {
            line.check_sides()?;
        }
        let (debits, credits) = self
            .totals()
            .ok_or_else(|| LedgerError::overflow("journal entry total"))?;
        if debits != credits {
            return Err(LedgerError::UnbalancedEntry { debits, credits });
        }
        Ok(())
    }

    pub fn id_typed(&self) -> EntryId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    /// (total debits, total credits), or `None` if a total leaves the
    /// decimal range.
    pub fn totals(&self) -> Option<(Decimal, Decimal)> {
        self.lines
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(d, c), l| {
                Some((d.checked_add(l.debit_amount())?, c.checked_add(l.credit_amount())?))
            })
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self.totals(), Some((debits, credits)) if debits == credits)
    }

    pub fn lines_for(&self, account_id: AccountId) -> impl Iterator<Item = &JournalLine> {
        self.lines.iter().filter(move |l| l.account_id == account_id)
    }
}

impl Entity for JournalEntry {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Optional knobs for the two-line `post_entry` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostOptions {
    pub reference: Option<String>,
    pub date: Option<NaiveDate>,
}

impl PostOptions {
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// A line of a multi-line posting request, addressed by account name.
///
/// Raw decimals are validated when the draft is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub account: String,
    pub debit: Decimal,
    pub credit: Decimal,
    #[serde(default)]
    pub memo: Option<String>,
}

impl DraftLine {
    pub fn debit(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    pub fn credit(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }
}

/// Multi-line posting request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    pub description: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub lines: Vec<DraftLine>,
}

impl JournalDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn debit(mut self, account: impl Into<String>, amount: Decimal) -> Self {
        self.lines.push(DraftLine::debit(account, amount));
        self
    }

    pub fn credit(mut self, account: impl Into<String>, amount: Decimal) -> Self {
        self.lines.push(DraftLine::credit(account, amount));
        self
    }

    /// Attach a memo to the most recently added line.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        if let Some(line) = self.lines.last_mut() {
            line.memo = Some(memo.into());
        }
        self
    }
}
