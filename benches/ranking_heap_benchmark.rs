use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ipgraph::collections::{heap_sort, RankingHeap};
use std::collections::BinaryHeap;

fn scrambled(n: u32) -> Vec<u32> {
    (0..n).map(|i| i.wrapping_mul(2_654_435_761) % 10_000).collect()
}

fn bench_ranking_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking_heap");
    let data = scrambled(1000);

    group.bench_function("std_binary_heap_push_pop", |b| {
        b.iter(|| {
            let mut heap = BinaryHeap::with_capacity(data.len());
            for &x in &data {
                heap.push(black_box(x));
            }
            while let Some(x) = heap.pop() {
                black_box(x);
            }
        });
    });

    group.bench_function("ranking_heap_push_pop", |b| {
        b.iter(|| {
            let mut heap = RankingHeap::with_capacity(data.len());
            for &x in &data {
                let _ = heap.push(black_box(x));
            }
            for x in heap.drain_sorted() {
                black_box(x);
            }
        });
    });

    group.bench_function("std_sort_unstable", |b| {
        b.iter(|| {
            let mut v = data.clone();
            v.sort_unstable();
            black_box(v);
        });
    });

    group.bench_function("heap_sort", |b| {
        b.iter(|| {
            let mut v = data.clone();
            heap_sort(&mut v);
            black_box(v);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ranking_heap);
criterion_main!(benches);
