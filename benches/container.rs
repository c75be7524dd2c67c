//! Benchmarks: ArrayContainer chains vs plain `ordermap::OrderMap` / `Vec` code
//!
//! | Benchmark        | What it measures                                   |
//! |------------------|----------------------------------------------------|
//! | Chain            | `map` → `filter` → `reverse` → `unshift`           |
//! | Queue            | `shift`/`unshift` renumbering vs `VecDeque`         |
//! | Lookup           | integer and named key lookups through `AsKey`       |
//! | ForEach          | generator-driven `for_each` vs a plain iterator     |
//!
//! `shift` renumbers every remaining integer key, so it is O(N); the Queue
//! group shows that cost.

use std::collections::VecDeque;

use array_container::{ArrayContainer, Key};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const N: usize = 1024;

// ─── Chain ────────────────────────────────────────────────────────────────────

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chain map/filter/reverse/unshift (N=1024)");

    group.bench_function("ArrayContainer", |b| {
        b.iter(|| {
            let mut container = ArrayContainer::from_values(0..N as i64);
            container
                .map(|v| v * 3)
                .filter(|v| v % 2 == 0, false)
                .reverse(false)
                .unshift([black_box(-1), black_box(-2)]);
            container
        })
    });

    group.bench_function("Vec (iterator adapters)", |b| {
        b.iter(|| {
            let mut v: Vec<i64> = (0..N as i64).map(|v| v * 3).filter(|v| v % 2 == 0).collect();
            v.reverse();
            v.splice(0..0, [black_box(-1), black_box(-2)]);
            v
        })
    });

    group.finish();
}

// ─── Queue ────────────────────────────────────────────────────────────────────

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("Queue shift/unshift (N=1024)");

    group.bench_function("ArrayContainer", |b| {
        b.iter(|| {
            let mut container = ArrayContainer::from_values(0..N as i64);
            for _ in 0..16 {
                let v = container.shift();
                container.unshift(v);
            }
            container
        })
    });

    group.bench_function("VecDeque", |b| {
        b.iter(|| {
            let mut deque: VecDeque<i64> = (0..N as i64).collect();
            for _ in 0..16 {
                if let Some(v) = deque.pop_front() {
                    deque.push_front(v);
                }
            }
            deque
        })
    });

    group.finish();
}

// ─── Lookup ───────────────────────────────────────────────────────────────────

fn bench_lookup(c: &mut Criterion) {
    let mut container = ArrayContainer::from_values(0..N as i64);
    let names: Vec<String> = (0..64).map(|i| format!("name-{i}")).collect();
    for (i, name) in names.iter().enumerate() {
        container.set(name.as_str(), i as i64);
    }
    let mut plain = ordermap::OrderMap::new();
    for i in 0..N {
        plain.insert(Key::from(i), i as i64);
    }

    let mut group = c.benchmark_group("Lookup (N=1024, all-hit)");

    group.bench_function("ArrayContainer integer keys", |b| {
        b.iter(|| {
            for i in 0..N {
                black_box(container.get(&black_box(i)));
            }
        })
    });

    group.bench_function("ArrayContainer named keys", |b| {
        b.iter(|| {
            for name in &names {
                black_box(container.get(black_box(name.as_str())));
            }
        })
    });

    group.bench_function("ordermap::OrderMap<Key, i64> owned keys", |b| {
        b.iter(|| {
            for i in 0..N {
                black_box(plain.get(&Key::from(black_box(i))));
            }
        })
    });

    group.finish();
}

// ─── ForEach ──────────────────────────────────────────────────────────────────

fn bench_for_each(c: &mut Criterion) {
    let container = ArrayContainer::from_values(0..N as i64);

    let mut group = c.benchmark_group("ForEach (N=1024, stop at half)");

    group.bench_function("ArrayContainer::for_each", |b| {
        b.iter(|| {
            let mut total = 0i64;
            container.for_each(|v, _| {
                total += *v;
                *v < (N / 2) as i64
            });
            black_box(total)
        })
    });

    group.bench_function("Iterator::take_while", |b| {
        b.iter(|| {
            let total: i64 = container.values().take_while(|v| **v < (N / 2) as i64).sum();
            black_box(total)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_chain, bench_queue, bench_lookup, bench_for_each);
criterion_main!(benches);
