use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tallybook_accounting::{
    AccountKind, DateRange, JournalDraft, Ledger, LedgerStore, NewAccount, PostOptions,
};

const ACCOUNTS: [(&str, AccountKind); 5] = [
    ("Cash", AccountKind::Asset),
    ("Accounts Receivable", AccountKind::Asset),
    ("Capital", AccountKind::Equity),
    ("Sales", AccountKind::Income),
    ("Rent", AccountKind::Expense),
];

fn day(n: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new((n % 365) as u64)
}

fn chart() -> Ledger {
    let mut ledger = Ledger::new();
    for (name, kind) in ACCOUNTS {
        ledger.open_account(NewAccount::new(name, kind)).unwrap();
    }
    ledger
}

/// Ledger with `entries` cash sales spread over a year.
fn busy_ledger(entries: usize) -> Ledger {
    let mut ledger = chart();
    for n in 0..entries {
        ledger
            .post_entry("Cash", "Sales", dec!(19.99), "sale", PostOptions::default().on(day(n)))
            .unwrap();
    }
    ledger
}

fn bench_posting_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("posting_latency");

    group.bench_function("post_entry", |b| {
        let mut ledger = chart();
        b.iter(|| {
            ledger
                .post_entry(
                    "Cash",
                    "Sales",
                    black_box(dec!(125.50)),
                    "Cash sale",
                    PostOptions::default().reference("BENCH"),
                )
                .unwrap();
        });
    });

    group.bench_function("post_journal_three_lines", |b| {
        let mut ledger = chart();
        b.iter(|| {
            let draft = JournalDraft::new("Split sale")
                .reference("BENCH")
                .debit("Cash", dec!(60))
                .debit("Accounts Receivable", dec!(40))
                .credit("Sales", black_box(dec!(100)));
            ledger.post_journal(draft).unwrap();
        });
    });

    group.finish();
}

fn bench_balance_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_queries");

    for size in [100usize, 1_000, 10_000] {
        let ledger = busy_ledger(size);
        let march = DateRange::month(2025, 3).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all_time", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.get_account_balance("Cash", DateRange::all()).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("one_month", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.get_account_balance("Cash", march).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("trial_balance", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.trial_balance(DateRange::all()).unwrap()));
        });
    }

    group.finish();
}

fn bench_snapshot_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_roundtrip");
    group.sample_size(20);

    for size in [1_000usize, 10_000] {
        let json = serde_json::to_string(busy_ledger(size).store()).unwrap();
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("load_and_verify", size), &json, |b, json| {
            b.iter(|| {
                let store: LedgerStore = serde_json::from_str(black_box(json)).unwrap();
                black_box(store.accounts().len())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_posting_latency,
    bench_balance_queries,
    bench_snapshot_roundtrip
);
criterion_main!(benches);
