use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pathlabel::{
    shortest_path, AdjacencyGraph, ChunkPool, Direction, HeapPolicy, IndexedHeap, LabelSearch,
    Pareto,
};
use std::cmp::Ordering;

/// Deterministic xorshift weights in `1..=max`.
fn weights(count: usize, max: u32, mut state: u64) -> Vec<u32> {
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % u64::from(max)) as u32 + 1
        })
        .collect()
}

fn bench_scalar_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_grid");
    for side in [32usize, 128] {
        let graph = AdjacencyGraph::grid(side, side);
        let w = weights(graph.edge_count(), 100, 0x9E37_79B9_7F4A_7C15);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
            let mut search = shortest_path(&graph, &w);
            b.iter(|| {
                let path = search
                    .solve_to(0, side * side - 1, Direction::Forward)
                    .unwrap();
                black_box(path.terminal_cost());
            });
        });
    }
    group.finish();
}

fn bench_pareto_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("pareto_grid");
    for side in [8usize, 16] {
        let graph = AdjacencyGraph::grid(side, side);
        let a = weights(graph.edge_count(), 20, 0xDEAD_BEEF);
        let b = weights(graph.edge_count(), 20, 0x1234_5678);
        let w: Vec<[u32; 2]> = a.into_iter().zip(b).map(|(x, y)| [x, y]).collect();
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |bench, _| {
            let mut search = LabelSearch::new(&graph, &w, Pareto::<u32, 2>::new());
            bench.iter(|| {
                search.solve(0, |_| false, Direction::Forward).unwrap();
                black_box(search.live_labels());
            });
        });
    }
    group.finish();
}

fn bench_pool_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_churn");

    group.bench_function("chunk_pool_alloc_reclaim", |b| {
        let mut pool = ChunkPool::new();
        b.iter(|| {
            let ids: Vec<_> = (0..1000u64).map(|i| pool.allocate(i)).collect();
            for id in ids {
                black_box(pool.reclaim(id));
            }
        });
    });

    group.bench_function("std_box_alloc_free", |b| {
        b.iter(|| {
            let boxes: Vec<_> = (0..1000u64).map(Box::new).collect();
            black_box(boxes);
        });
    });

    group.finish();
}

struct Slots {
    keys: Vec<u32>,
    positions: Vec<Option<usize>>,
}

impl HeapPolicy for Slots {
    type Element = usize;
    type Key = u32;

    fn position(&self, e: usize) -> Option<usize> {
        self.positions[e]
    }

    fn update_position(&mut self, e: usize, _old: Option<usize>, new: Option<usize>) {
        self.positions[e] = new;
    }

    fn key(&self, e: usize) -> u32 {
        self.keys[e]
    }

    fn compare(&self, a: &u32, b: &u32) -> Ordering {
        a.cmp(b)
    }
}

fn bench_indexed_heap(c: &mut Criterion) {
    let keys = weights(1000, 1_000_000, 42);
    c.bench_function("indexed_heap_push_pop", |b| {
        let mut slots = Slots {
            keys: keys.clone(),
            positions: vec![None; keys.len()],
        };
        let mut heap = IndexedHeap::with_capacity(keys.len());
        b.iter(|| {
            for e in 0..keys.len() {
                heap.push(&mut slots, e);
            }
            while let Some(e) = heap.pop(&mut slots) {
                black_box(e);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_scalar_grid,
    bench_pareto_grid,
    bench_pool_churn,
    bench_indexed_heap
);
criterion_main!(benches);
