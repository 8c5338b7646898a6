//! Year-end closing of income and expense accounts.

use rust_decimal::Decimal;
use tracing::info;

use tallybook_core::Amount;

use crate::account::AccountKind;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::{JournalEntry, JournalLine};
use crate::ledger::Ledger;
use crate::period::DateRange;
use crate::sink::SnapshotSink;

pub const CLOSING_REFERENCE: &str = "CLOSING";

impl<S: SnapshotSink> Ledger<S> {
    /// Zero every income and expense account as of December 31st of `year`
    /// and move the net result into `retained_earnings`.
    ///
    /// Posts a single entry referenced `CLOSING`. Returns `None` when every
    /// temporary account is already at zero. Inactive temporary accounts are
    /// closed too, but `retained_earnings` must be an active equity account.
    #[tracing::instrument(skip(self), fields(ledger_id = %self.id()))]
    pub fn close_year(
        &mut self,
        year: i32,
        retained_earnings: &str,
    ) -> LedgerResult<Option<JournalEntry>> {
        let closing_date = DateRange::year(year)?
            .to
            .ok_or_else(|| LedgerError::InvalidEntry(format!("no year end for {year}")))?;
        let as_of = DateRange::until(closing_date);

        let retained = self.postable_account(retained_earnings)?;
        if retained.kind() != AccountKind::Equity {
            return Err(LedgerError::InvalidEntry(format!(
                "{retained_earnings} must be an equity account, found {}",
                retained.kind()
            )));
        }
        let retained_id = retained.id_typed();

        let mut lines = Vec::new();
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for account in self.store().accounts().iter().filter(|a| a.kind().is_temporary()) {
            let balance = self.store().balance_of(account, as_of)?;
            if balance > Decimal::ZERO {
                lines.push(JournalLine::credit(account.id_typed(), Amount::positive(balance)?));
                credits = credits
                    .checked_add(balance)
                    .ok_or_else(|| LedgerError::overflow("closing credits"))?;
            } else if balance < Decimal::ZERO {
                lines.push(JournalLine::debit(account.id_typed(), Amount::positive(-balance)?));
                debits = debits
                    .checked_sub(balance)
                    .ok_or_else(|| LedgerError::overflow("closing debits"))?;
            }
        }

        if lines.is_empty() {
            return Ok(None);
        }

        // Closing debits come from income, closing credits from expenses.
        let net_income = debits
            .checked_sub(credits)
            .ok_or_else(|| LedgerError::overflow("net income"))?;
        if net_income > Decimal::ZERO {
            lines.push(JournalLine::credit(retained_id, Amount::positive(net_income)?));
        } else if net_income < Decimal::ZERO {
            lines.push(JournalLine::debit(retained_id, Amount::positive(-net_income)?));
        }

        let entry = JournalEntry::balanced(
            closing_date,
            CLOSING_REFERENCE.to_string(),
            format!("Year-end closing {year}: net income {net_income}"),
            lines,
        )?;
        let entry = self.record(entry)?;
        info!(year, %net_income, "year closed");
        Ok(Some(entry))
    }
}
