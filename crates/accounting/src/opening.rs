//! Opening balances for a new financial year.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::journal::{DraftLine, JournalDraft, JournalEntry};
use crate::ledger::Ledger;
use crate::sink::SnapshotSink;

pub const OPENING_REFERENCE: &str = "OPENING";

impl<S: SnapshotSink> Ledger<S> {
    /// Post `lines` as a single `OPENING` entry dated January 1st of `year`.
    ///
    /// Validated like [`Ledger::post_journal`]: every account must exist and be
    /// active, amounts must be non-negative, and debits must equal credits.
    /// A year can be opened only once.
    #[tracing::instrument(skip(self, lines), fields(ledger_id = %self.id(), lines = lines.len()))]
    pub fn apply_opening_balances(
        &mut self,
        year: i32,
        lines: Vec<DraftLine>,
    ) -> LedgerResult<JournalEntry> {
        let date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| LedgerError::InvalidEntry(format!("year {year} is out of range")))?;

        let already_opened = self
            .journal()
            .iter()
            .any(|e| e.reference() == OPENING_REFERENCE && e.date() == date);
        if already_opened {
            return Err(LedgerError::InvalidEntry(format!(
                "opening balances for {year} were already applied"
            )));
        }

        let entry = self.post_journal(JournalDraft {
            description: "Opening Balances".to_string(),
            reference: Some(OPENING_REFERENCE.to_string()),
            date: Some(date),
            lines,
        })?;
        info!(year, entry_id = %entry.id_typed(), "opening balances applied");
        Ok(entry)
    }
}
