//! Benchmark harness using Criterion for book operation throughput.
//!
//! Measures:
//! - Add order (no match)
//! - Add order that fully matches through resting depth
//! - Cancel order
//! - Mixed workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lob_core::{LimitOrder, MatchingEngine, Side};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn order(id: u64, side: Side, price: f64, qty: u64) -> LimitOrder {
    LimitOrder {
        id,
        side,
        price,
        qty,
        seq: id,
        timestamp_ns: id,
    }
}

/// Benchmark: Add order that rests (no matching)
fn bench_add_no_match(c: &mut Criterion) {
    let mut engine = MatchingEngine::with_capacity(1_000_000);
    let mut id = 0u64;

    c.bench_function("add_no_match", |b| {
        b.iter(|| {
            id += 1;
            // Below any asks, never crosses
            black_box(engine.add_order(order(id, Side::Bid, 90.00, 100)))
        })
    });
}

/// Benchmark: Add order that sweeps resting depth
fn bench_add_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_full_match");

    for depth in [1usize, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut id = 0u64;
            b.iter_batched(
                || {
                    let mut engine = MatchingEngine::with_capacity(10_000);
                    for _ in 0..depth {
                        id += 1;
                        engine.add_order(order(id, Side::Ask, 100.00, 100)).unwrap();
                    }
                    id += 1;
                    (engine, order(id, Side::Bid, 100.00, 100 * depth as u64))
                },
                |(mut engine, taker)| black_box(engine.add_order(taker)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark: Cancel a resting order
fn bench_cancel(c: &mut Criterion) {
    c.bench_function("cancel", |b| {
        let mut id = 0u64;
        b.iter_batched(
            || {
                let mut engine = MatchingEngine::with_capacity(10_000);
                id += 1;
                engine.add_order(order(id, Side::Bid, 99.50, 100)).unwrap();
                (engine, id)
            },
            |(mut engine, id)| black_box(engine.cancel_order(id)),
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark: Mixed add/cancel/amend workload
fn bench_mixed_workload(c: &mut Criterion) {
    c.bench_function("mixed_workload_1k_ops", |b| {
        b.iter_batched(
            || {
                let mut rng = ChaCha8Rng::seed_from_u64(99);
                let mut ops = Vec::with_capacity(1_000);
                let mut active = Vec::new();
                let mut next_id = 1u64;
                for _ in 0..1_000 {
                    let roll: f64 = rng.gen();
                    if active.is_empty() || roll < 0.6 {
                        let id = next_id;
                        next_id += 1;
                        active.push(id);
                        ops.push((
                            0u8,
                            id,
                            rng.gen_range(9900..10100) as f64 * 0.01,
                            rng.gen_range(1..500),
                        ));
                    } else if roll < 0.85 {
                        let idx = rng.gen_range(0..active.len());
                        ops.push((1, active.swap_remove(idx), 0.0, 0));
                    } else {
                        let id = active[rng.gen_range(0..active.len())];
                        ops.push((
                            2,
                            id,
                            rng.gen_range(9900..10100) as f64 * 0.01,
                            rng.gen_range(1..500),
                        ));
                    }
                }
                ops
            },
            |ops| {
                let mut engine = MatchingEngine::with_capacity(10_000);
                for (kind, id, price, qty) in ops {
                    match kind {
                        0 => {
                            let side = if id % 2 == 0 { Side::Bid } else { Side::Ask };
                            let _ = engine.add_order(order(id, side, price, qty));
                        }
                        1 => {
                            engine.cancel_order(id);
                        }
                        _ => {
                            let _ = engine.amend_order(id, price, qty);
                        }
                    }
                }
                black_box(engine.order_count())
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_add_no_match,
    bench_add_full_match,
    bench_cancel,
    bench_mixed_workload
);
criterion_main!(benches);
