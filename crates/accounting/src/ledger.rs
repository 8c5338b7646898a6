use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tallybook_core::{Amount, EntryId, LedgerId, error::require_text};
use tallybook_events::{Event, EventLog};

use crate::account::{Account, NewAccount};
use crate::error::{LedgerError, LedgerResult};
use crate::event::{AccountOpened, AccountStatusChanged, EntryPosted, LedgerEvent};
use crate::journal::{JournalDraft, JournalEntry, JournalLine, PostOptions};
use crate::options::{LedgerOptions, MissingAccountPolicy};
use crate::period::DateRange;
use crate::sink::{NoopSink, SnapshotSink};
use crate::store::LedgerStore;

/// Double-entry ledger engine.
///
/// Owns the [`LedgerStore`] exclusively: balances change only through the
/// posting operations below. Every change is applied in memory, handed to the
/// [`SnapshotSink`], and rolled back if the sink fails, so each operation is
/// all-or-nothing.
#[derive(Debug)]
pub struct Ledger<S = NoopSink> {
    id: LedgerId,
    store: LedgerStore,
    sink: S,
    options: LedgerOptions,
    audit: EventLog<LedgerEvent>,
}

impl Ledger<NoopSink> {
    /// Empty in-memory ledger with default options.
    pub fn new() -> Self {
        Self::from_store(LedgerStore::new(), NoopSink, LedgerOptions::default())
    }
}

impl Default for Ledger<NoopSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SnapshotSink> Ledger<S> {
    pub fn from_store(store: LedgerStore, sink: S, options: LedgerOptions) -> Self {
        Self::with_id(LedgerId::new(), store, sink, options)
    }

    /// Like [`Ledger::from_store`] under a caller-chosen id, e.g. the key a
    /// snapshot was stored under.
    pub fn with_id(id: LedgerId, store: LedgerStore, sink: S, options: LedgerOptions) -> Self {
        Self {
            id,
            store,
            sink,
            options,
            audit: EventLog::new(id),
        }
    }

    pub fn with_options(mut self, options: LedgerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> LedgerId {
        self.id
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Changes recorded since this engine instance was created.
    pub fn audit_trail(&self) -> &EventLog<LedgerEvent> {
        &self.audit
    }

    pub fn into_store(self) -> LedgerStore {
        self.store
    }

    pub fn accounts(&self) -> &[Account] {
        self.store.accounts()
    }

    pub fn journal(&self) -> &[JournalEntry] {
        self.store.journal()
    }

    /// Exact, case-sensitive lookup by name.
    pub fn lookup_account(&self, name: &str) -> Option<&Account> {
        self.store.lookup_account(name)
    }

    #[tracing::instrument(skip(self, new), fields(ledger_id = %self.id, account = %new.name))]
    pub fn open_account(&mut self, mut new: NewAccount) -> LedgerResult<Account> {
        new.name = new.name.trim().to_string();
        require_text("account name", &new.name)?;
        if self.store.lookup_account(&new.name).is_some() {
            return Err(LedgerError::DuplicateAccount(new.name));
        }

        let account = Account::open(new);
        self.commit(LedgerEvent::AccountOpened(AccountOpened {
            account: account.clone(),
            occurred_at: Utc::now(),
        }))?;
        info!(account_id = %account.id_typed(), kind = %account.kind(), "account opened");
        Ok(account)
    }

    /// Soft-deactivate: the account keeps its history but refuses new postings.
    pub fn deactivate_account(&mut self, name: &str) -> LedgerResult<()> {
        let account = self.require_account(name)?;
        if !account.is_active() {
            return Ok(());
        }
        let event = LedgerEvent::AccountDeactivated(AccountStatusChanged {
            account_id: account.id_typed(),
            name: account.name().to_string(),
            occurred_at: Utc::now(),
        });
        self.commit(event)
    }

    pub fn reactivate_account(&mut self, name: &str) -> LedgerResult<()> {
        let account = self.require_account(name)?;
        if account.is_active() {
            return Ok(());
        }
        let event = LedgerEvent::AccountReactivated(AccountStatusChanged {
            account_id: account.id_typed(),
            name: account.name().to_string(),
            occurred_at: Utc::now(),
        });
        self.commit(event)
    }

    /// Two-line posting: debit `debit_account`, credit `credit_account`.
    ///
    /// The debited balance rises by `amount` and the credited balance falls by
    /// it, whatever the account kinds.
    #[tracing::instrument(
        skip(self, description, options),
        fields(ledger_id = %self.id, debit = debit_account, credit = credit_account, %amount)
    )]
    pub fn post_entry(
        &mut self,
        debit_account: &str,
        credit_account: &str,
        amount: Decimal,
        description: impl Into<String>,
        options: PostOptions,
    ) -> LedgerResult<JournalEntry> {
        let amount = Amount::positive(amount)?;
        let debit = self.postable_account(debit_account)?.id_typed();
        let credit = self.postable_account(credit_account)?.id_typed();

        let date = options.date.unwrap_or_else(today);
        let reference = options
            .reference
            .unwrap_or_else(|| self.next_reference(date));

        let entry = JournalEntry::balanced(
            date,
            reference,
            description.into(),
            vec![
                JournalLine::debit(debit, amount),
                JournalLine::credit(credit, amount),
            ],
        )?;
        self.record(entry)
    }

    /// General multi-line posting. Debits must equal credits.
    #[tracing::instrument(skip(self, draft), fields(ledger_id = %self.id, lines = draft.lines.len()))]
    pub fn post_journal(&mut self, draft: JournalDraft) -> LedgerResult<JournalEntry> {
        let mut lines = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let debit = Amount::new(line.debit)?;
            let credit = Amount::new(line.credit)?;
            let account = self.postable_account(&line.account)?.id_typed();
            lines.push(JournalLine::from_sides(account, debit, credit).with_memo(line.memo.clone()));
        }

        let date = draft.date.unwrap_or_else(today);
        let reference = draft
            .reference
            .unwrap_or_else(|| self.next_reference(date));

        let entry = JournalEntry::balanced(date, reference, draft.description, lines)?;
        self.record(entry)
    }

    /// Correct a posted entry by posting its mirror image.
    pub fn reverse_entry(
        &mut self,
        entry_id: EntryId,
        date: Option<NaiveDate>,
    ) -> LedgerResult<JournalEntry> {
        let original = self
            .store
            .entry(entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        for line in original.lines() {
            let account = self.store.account(line.account_id()).ok_or_else(|| {
                LedgerError::CorruptSnapshot(format!("unknown account {}", line.account_id()))
            })?;
            if !account.is_active() {
                return Err(LedgerError::AccountInactive(account.name().to_string()));
            }
        }

        let entry = JournalEntry::balanced(
            date.unwrap_or_else(today),
            format!("REV-{}", original.reference()),
            format!("Reversal of {}", original.description()),
            original.lines().iter().map(JournalLine::reversed).collect(),
        )?;
        self.record(entry)
    }

    /// Opening balance plus activity in `range`.
    ///
    /// Unknown names follow [`LedgerOptions::missing_account`].
    pub fn get_account_balance(&self, name: &str, range: DateRange) -> LedgerResult<Decimal> {
        match self.store.account_balance(name, range) {
            Err(LedgerError::AccountNotFound(_))
                if self.options.missing_account == MissingAccountPolicy::ZeroBalance =>
            {
                Ok(Decimal::ZERO)
            }
            other => other,
        }
    }

    /// Like [`Ledger::get_account_balance`] but always fails on unknown names.
    pub fn strict_account_balance(&self, name: &str, range: DateRange) -> LedgerResult<Decimal> {
        self.store.account_balance(name, range)
    }

    pub fn verify_integrity(&self) -> LedgerResult<()> {
        self.store.verify_integrity()
    }

    pub(crate) fn require_account(&self, name: &str) -> LedgerResult<&Account> {
        self.store
            .lookup_account(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    pub(crate) fn postable_account(&self, name: &str) -> LedgerResult<&Account> {
        let account = self.require_account(name)?;
        if !account.is_active() {
            return Err(LedgerError::AccountInactive(name.to_string()));
        }
        Ok(account)
    }

    /// `{prefix}-{YYYYMMDD}-{sequence}`; the sequence is the journal position.
    fn next_reference(&self, date: NaiveDate) -> String {
        format!(
            "{}-{}-{:06}",
            self.options.reference_prefix,
            date.format("%Y%m%d"),
            self.store.journal().len() + 1
        )
    }

    pub(crate) fn record(&mut self, entry: JournalEntry) -> LedgerResult<JournalEntry> {
        self.commit(LedgerEvent::EntryPosted(EntryPosted {
            entry: entry.clone(),
            occurred_at: Utc::now(),
        }))?;
        debug!(
            entry_id = %entry.id_typed(),
            reference = entry.reference(),
            date = %entry.date(),
            "journal entry posted"
        );
        Ok(entry)
    }

    fn commit(&mut self, event: LedgerEvent) -> LedgerResult<()> {
        self.store.apply(&event)?;
        if let Err(err) = self.sink.save(&self.store) {
            self.store.revert(&event);
            warn!(
                ledger_id = %self.id,
                event_type = event.event_type(),
                error = %err,
                "snapshot save failed, change rolled back"
            );
            return Err(LedgerError::Persistence(format!("{err:#}")));
        }
        self.audit.append(&self.options.actor, event);
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountKind;
    use proptest::prelude::*;
    use tallybook_core::AmountError;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cash_and_sales() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.open_account(NewAccount::new("Cash", AccountKind::Asset)).unwrap();
        ledger.open_account(NewAccount::new("Sales", AccountKind::Income)).unwrap();
        ledger
    }

    #[test]
    fn cash_sale_moves_both_balances() {
        let mut ledger = cash_and_sales();

        let entry = ledger
            .post_entry("Cash", "Sales", dec!(500), "Cash sale", PostOptions::default())
            .unwrap();

        assert_eq!(ledger.journal().len(), 1);
        assert_eq!(entry.lines().len(), 2);
        assert_eq!(entry.totals(), Some((dec!(500), dec!(500))));
        assert_eq!(ledger.lookup_account("Cash").unwrap().balance(), dec!(500));
        assert_eq!(ledger.lookup_account("Sales").unwrap().balance(), dec!(-500));
        assert_eq!(ledger.get_account_balance("Cash", DateRange::all()).unwrap(), dec!(500));
        assert_eq!(entry.date(), today());
    }

    #[test]
    fn unknown_credit_account_changes_nothing() {
        let mut ledger = cash_and_sales();
        ledger
            .post_entry("Cash", "Sales", dec!(10), "seed", PostOptions::default())
            .unwrap();
        let before = ledger.store().clone();

        let err = ledger
            .post_entry("Cash", "NoSuchAccount", dec!(100), "test", PostOptions::default())
            .unwrap_err();

        assert_eq!(err, LedgerError::AccountNotFound("NoSuchAccount".to_string()));
        assert_eq!(ledger.store(), &before);
        assert_eq!(ledger.journal().len(), 1);
        assert_eq!(ledger.lookup_account("Cash").unwrap().balance(), dec!(10));
    }

    #[test]
    fn unknown_debit_account_changes_nothing() {
        let mut ledger = cash_and_sales();
        let before = ledger.store().clone();
        let err = ledger
            .post_entry("Nope", "Sales", dec!(1), "test", PostOptions::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(name) if name == "Nope"));
        assert_eq!(ledger.store(), &before);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut ledger = cash_and_sales();
        let before = ledger.store().clone();

        for amount in [dec!(-50), Decimal::ZERO] {
            let err = ledger
                .post_entry("Cash", "Sales", amount, "bad amount", PostOptions::default())
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)));
        }
        assert_eq!(ledger.store(), &before);
        assert!(ledger.audit_trail().iter().all(|e| e.payload().event_type() != "ledger.entry.posted"));
    }

    #[test]
    fn amounts_that_overflow_a_balance_are_rejected() {
        let mut ledger = cash_and_sales();
        ledger
            .post_entry("Cash", "Sales", Decimal::MAX, "max", PostOptions::default())
            .unwrap();
        let before = ledger.store().clone();

        let err = ledger
            .post_entry("Cash", "Sales", Decimal::MAX, "again", PostOptions::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(AmountError::OutOfRange(_))));

        let err = ledger
            .post_journal(
                JournalDraft::new("x")
                    .debit("Cash", Decimal::MAX)
                    .debit("Cash", Decimal::MAX)
                    .credit("Sales", dec!(1)),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(AmountError::OutOfRange(_))));

        assert_eq!(ledger.store(), &before);
        assert_eq!(ledger.get_account_balance("Cash", DateRange::all()), Ok(Decimal::MAX));
        ledger
            .post_entry("Sales", "Cash", dec!(1), "still usable", PostOptions::default())
            .unwrap();
    }

    #[test]
    fn date_filter_selects_a_single_month() {
        let mut ledger = Ledger::new();
        ledger.open_account(NewAccount::new("A", AccountKind::Asset)).unwrap();
        ledger.open_account(NewAccount::new("B", AccountKind::Liability)).unwrap();
        for month in 1..=3 {
            ledger
                .post_entry("A", "B", dec!(100), "monthly", PostOptions::default().on(d(2025, month, 1)))
                .unwrap();
        }

        let feb = DateRange::between(d(2025, 2, 1), d(2025, 2, 28));
        assert_eq!(ledger.get_account_balance("A", feb).unwrap(), dec!(100));
        assert_eq!(ledger.get_account_balance("A", DateRange::all()).unwrap(), dec!(300));
        assert_eq!(
            ledger.get_account_balance("A", DateRange::starting(d(2025, 2, 15))).unwrap(),
            dec!(100)
        );
    }

    #[test]
    fn opening_balance_is_always_included() {
        let mut ledger = Ledger::new();
        ledger
            .open_account(NewAccount::new("Bank", AccountKind::Asset).with_opening(dec!(1000)))
            .unwrap();
        ledger
            .open_account(NewAccount::new("Capital", AccountKind::Equity).with_opening(dec!(-1000)))
            .unwrap();

        let inverted = DateRange::between(d(2025, 3, 1), d(2025, 1, 1));
        assert_eq!(ledger.get_account_balance("Bank", inverted).unwrap(), dec!(1000));
        assert_eq!(ledger.lookup_account("Capital").unwrap().balance(), dec!(-1000));
    }

    #[test]
    fn missing_account_policy_controls_balance_queries() {
        let lenient = cash_and_sales();
        assert_eq!(lenient.get_account_balance("Csah", DateRange::all()).unwrap(), Decimal::ZERO);
        assert!(matches!(
            lenient.strict_account_balance("Csah", DateRange::all()),
            Err(LedgerError::AccountNotFound(_))
        ));

        let strict = cash_and_sales().with_options(LedgerOptions::strict());
        assert_eq!(
            strict.get_account_balance("Csah", DateRange::all()),
            Err(LedgerError::AccountNotFound("Csah".to_string()))
        );
    }

    #[test]
    fn duplicate_and_blank_names_are_refused() {
        let mut ledger = cash_and_sales();
        assert_eq!(
            ledger.open_account(NewAccount::new("Cash", AccountKind::Asset)),
            Err(LedgerError::DuplicateAccount("Cash".to_string()))
        );
        assert!(matches!(
            ledger.open_account(NewAccount::new("  ", AccountKind::Asset)),
            Err(LedgerError::Domain(_))
        ));
        assert_eq!(ledger.accounts().len(), 2);
    }

    #[test]
    fn generated_references_combine_date_and_sequence() {
        let mut ledger = cash_and_sales();
        let first = ledger
            .post_entry("Cash", "Sales", dec!(1), "a", PostOptions::default().on(d(2025, 4, 9)))
            .unwrap();
        let second = ledger
            .post_entry("Cash", "Sales", dec!(1), "b", PostOptions::default().reference("INV-77"))
            .unwrap();
        let third = ledger
            .post_entry("Cash", "Sales", dec!(1), "c", PostOptions::default().on(d(2025, 4, 10)))
            .unwrap();

        assert_eq!(first.reference(), "JE-20250409-000001");
        assert_eq!(second.reference(), "INV-77");
        assert_eq!(third.reference(), "JE-20250410-000003");
    }

    #[test]
    fn inactive_accounts_refuse_postings_until_reactivated() {
        let mut ledger = cash_and_sales();
        ledger.deactivate_account("Sales").unwrap();

        let err = ledger
            .post_entry("Cash", "Sales", dec!(5), "x", PostOptions::default())
            .unwrap_err();
        assert_eq!(err, LedgerError::AccountInactive("Sales".to_string()));
        assert!(ledger.journal().is_empty());

        ledger.reactivate_account("Sales").unwrap();
        ledger
            .post_entry("Cash", "Sales", dec!(5), "x", PostOptions::default())
            .unwrap();
        assert_eq!(ledger.lookup_account("Sales").unwrap().balance(), dec!(-5));
    }

    #[test]
    fn multi_line_posting_must_balance() {
        let mut ledger = cash_and_sales();
        ledger.open_account(NewAccount::new("Tax Payable", AccountKind::Liability)).unwrap();

        let err = ledger
            .post_journal(
                JournalDraft::new("Sale with tax")
                    .debit("Cash", dec!(118))
                    .credit("Sales", dec!(100))
                    .credit("Tax Payable", dec!(17)),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnbalancedEntry {
                debits: dec!(118),
                credits: dec!(117)
            }
        );
        assert!(ledger.journal().is_empty());

        let entry = ledger
            .post_journal(
                JournalDraft::new("Sale with tax")
                    .on(d(2025, 6, 1))
                    .debit("Cash", dec!(118))
                    .credit("Sales", dec!(100))
                    .credit("Tax Payable", dec!(18))
                    .memo("GST 18%"),
            )
            .unwrap();
        assert_eq!(entry.lines().len(), 3);
        assert_eq!(entry.lines()[2].memo(), Some("GST 18%"));
        assert_eq!(ledger.lookup_account("Tax Payable").unwrap().balance(), dec!(-18));
    }

    #[test]
    fn multi_line_posting_rejects_malformed_lines() {
        let mut ledger = cash_and_sales();

        let negative = JournalDraft::new("neg").debit("Cash", dec!(-1)).credit("Sales", dec!(-1));
        assert!(matches!(ledger.post_journal(negative), Err(LedgerError::InvalidAmount(_))));

        let mut both = JournalDraft::new("both").debit("Cash", dec!(5)).credit("Sales", dec!(5));
        both.lines[0].credit = dec!(5);
        assert!(matches!(ledger.post_journal(both), Err(LedgerError::InvalidEntry(_))));

        let single = JournalDraft::new("one").debit("Cash", dec!(5));
        assert!(matches!(ledger.post_journal(single), Err(LedgerError::InvalidEntry(_))));

        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn reversal_nets_to_zero() {
        let mut ledger = cash_and_sales();
        let original = ledger
            .post_entry("Cash", "Sales", dec!(250), "Invoice 9", PostOptions::default().reference("INV-9"))
            .unwrap();

        let reversal = ledger
            .reverse_entry(original.id_typed(), Some(d(2025, 7, 1)))
            .unwrap();

        assert_eq!(reversal.reference(), "REV-INV-9");
        assert_eq!(reversal.description(), "Reversal of Invoice 9");
        assert_eq!(ledger.lookup_account("Cash").unwrap().balance(), Decimal::ZERO);
        assert_eq!(ledger.lookup_account("Sales").unwrap().balance(), Decimal::ZERO);

        let missing = EntryId::new();
        assert_eq!(
            ledger.reverse_entry(missing, None),
            Err(LedgerError::EntryNotFound(missing))
        );
    }

    #[test]
    fn failing_sink_rolls_back_the_change() {
        let mut saves = 0;
        let sink = move |_store: &LedgerStore| -> anyhow::Result<()> {
            saves += 1;
            if saves > 2 {
                anyhow::bail!("disk full");
            }
            Ok(())
        };
        let mut ledger = Ledger::from_store(LedgerStore::new(), sink, LedgerOptions::default());
        ledger.open_account(NewAccount::new("Cash", AccountKind::Asset)).unwrap();
        ledger.open_account(NewAccount::new("Sales", AccountKind::Income)).unwrap();
        let before = ledger.store().clone();

        let err = ledger
            .post_entry("Cash", "Sales", dec!(40), "lost", PostOptions::default())
            .unwrap_err();

        assert!(matches!(err, LedgerError::Persistence(msg) if msg.contains("disk full")));
        assert_eq!(ledger.store(), &before);
        assert_eq!(ledger.audit_trail().len(), 2);

        let err = ledger.open_account(NewAccount::new("Bank", AccountKind::Asset)).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert!(ledger.lookup_account("Bank").is_none());
    }

    #[test]
    fn audit_trail_records_every_change_in_order() {
        let mut ledger = cash_and_sales().with_options(LedgerOptions {
            actor: "admin".to_string(),
            ..LedgerOptions::default()
        });
        ledger
            .post_entry("Cash", "Sales", dec!(1), "x", PostOptions::default())
            .unwrap();
        ledger.deactivate_account("Sales").unwrap();

        let types: Vec<&str> = ledger.audit_trail().iter().map(|e| e.payload().event_type()).collect();
        assert_eq!(
            types,
            vec![
                "ledger.account.opened",
                "ledger.account.opened",
                "ledger.entry.posted",
                "ledger.account.deactivated",
            ]
        );
        assert_eq!(ledger.audit_trail().last_sequence(), 4);
        assert_eq!(ledger.audit_trail().since(2).first().unwrap().actor(), "admin");
    }

    #[test]
    fn balance_queries_are_repeatable() {
        let mut ledger = cash_and_sales();
        ledger
            .post_entry("Cash", "Sales", dec!(33.3), "x", PostOptions::default())
            .unwrap();
        let range = DateRange::until(today());
        let first = ledger.get_account_balance("Cash", range).unwrap();
        let second = ledger.get_account_balance("Cash", range).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of postings (valid or not), every cached
        /// balance equals opening + Σ(debit - credit) and every entry balances.
        #[test]
        fn balances_always_match_the_journal(
            openings in prop::collection::vec(-10_000i64..10_000i64, 4),
            postings in prop::collection::vec((0usize..5, 0usize..5, -100i64..100_000i64, 1u32..=28), 0..40)
        ) {
            let names = ["Cash", "Bank", "Payables", "Sales", "Rent"];
            let kinds = [
                AccountKind::Asset,
                AccountKind::Asset,
                AccountKind::Liability,
                AccountKind::Income,
                AccountKind::Expense,
            ];
            let mut ledger = Ledger::new();
            // The fifth name is never opened so some postings must fail cleanly.
            for i in 0..4 {
                ledger
                    .open_account(
                        NewAccount::new(names[i], kinds[i]).with_opening(Decimal::new(openings[i], 2)),
                    )
                    .unwrap();
            }

            for (debit, credit, cents, day) in postings {
                let before = ledger.store().clone();
                let result = ledger.post_entry(
                    names[debit],
                    names[credit],
                    Decimal::new(cents, 2),
                    "generated",
                    PostOptions::default().on(d(2025, 1, day)),
                );
                if result.is_err() {
                    prop_assert_eq!(ledger.store(), &before);
                }
            }

            prop_assert!(ledger.verify_integrity().is_ok());
            for entry in ledger.journal() {
                prop_assert!(entry.is_balanced());
            }
            for account in ledger.accounts() {
                let derived = account.opening()
                    + ledger
                        .journal()
                        .iter()
                        .flat_map(|e| e.lines_for(account.id_typed()))
                        .map(JournalLine::net)
                        .sum::<Decimal>();
                prop_assert_eq!(account.balance(), derived);
                let queried = ledger.get_account_balance(account.name(), DateRange::all()).unwrap();
                prop_assert_eq!(queried, account.balance());
                prop_assert_eq!(queried, ledger.get_account_balance(account.name(), DateRange::all()).unwrap());
            }
        }
    }
}
