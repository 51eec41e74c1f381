//! Benchmarks for quote ingestion
//!
//! Measures one bookTicker frame through validation, merge and evaluation,
//! with and without concurrent readers on the price table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tri_arb::core::{QuoteEvent, QuoteSide, TriangleSpec};
use tri_arb::hot_path::QuoteIngestor;

fn warm_ingestor() -> QuoteIngestor {
    let triangle = TriangleSpec::usdt_cycle("BTCUSDT", "ETHBTC", "ETHUSDT").expect("valid triangle");
    let ingestor = QuoteIngestor::new(Arc::new(triangle));
    for (symbol, bid, ask) in [
        ("BTCUSDT", "64999.99", "65000.00"),
        ("ETHBTC", "0.04999", "0.05000"),
        ("ETHUSDT", "3300.00", "3300.01"),
    ] {
        ingestor.apply_all([
            QuoteEvent::new(symbol, QuoteSide::Bid, bid),
            QuoteEvent::new(symbol, QuoteSide::Ask, ask),
        ]);
    }
    ingestor
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestor");
    let ingestor = warm_ingestor();

    group.bench_function("apply_single", |b| {
        b.iter(|| {
            let outcome = ingestor.apply(black_box(QuoteEvent::new(
                "ETHUSDT",
                QuoteSide::Bid,
                "3301.25",
            )));
            black_box(outcome);
        })
    });

    group.bench_function("apply_book_ticker", |b| {
        b.iter(|| {
            let outcome = ingestor.apply_all(black_box([
                QuoteEvent::new("ETHBTC", QuoteSide::Bid, "0.05001"),
                QuoteEvent::new("ETHBTC", QuoteSide::Ask, "0.05002"),
            ]));
            black_box(outcome);
        })
    });

    group.bench_function("reject_unknown_symbol", |b| {
        b.iter(|| {
            let outcome = ingestor.apply(black_box(QuoteEvent::new(
                "BNBUSDT",
                QuoteSide::Bid,
                "600.1",
            )));
            black_box(outcome);
        })
    });

    group.finish();
}

fn bench_apply_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestor_contended");
    let ingestor = warm_ingestor();
    let table = ingestor.table();
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let table = table.clone();
            let stop = stop.clone();
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    black_box(table.read().get("BTCUSDT", QuoteSide::Ask));
                }
            })
        })
        .collect();

    group.bench_function("apply_book_ticker_2_readers", |b| {
        b.iter(|| {
            let outcome = ingestor.apply_all(black_box([
                QuoteEvent::new("BTCUSDT", QuoteSide::Bid, "64998.50"),
                QuoteEvent::new("BTCUSDT", QuoteSide::Ask, "64999.00"),
            ]));
            black_box(outcome);
        })
    });

    group.finish();

    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

criterion_group!(benches, bench_apply, bench_apply_contended);
criterion_main!(benches);
