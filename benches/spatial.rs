//! Benchmarks for the interval tree and the planar set built on it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use planum::bounds::Aabb2;
use planum::spatial::{IntervalTree, PlanarSet};
use planum::Point2;

fn next(state: &mut u64) -> f64 {
    // xorshift for deterministic random
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state as f64 / u64::MAX as f64
}

/// Generates random boxes inside [0, 100]².
fn generate_random_boxes(count: usize, seed: u64) -> Vec<Aabb2<f64>> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            let x = next(&mut state) * 100.0;
            let y = next(&mut state) * 100.0;
            let w = next(&mut state) * 5.0 + 0.5;
            let h = next(&mut state) * 5.0 + 0.5;
            Aabb2::new(Point2::new(x, y), Point2::new(x + w, y + h))
        })
        .collect()
}

fn bench_tree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_tree_insert");

    for count in [100, 1000, 10000] {
        let boxes = generate_random_boxes(count, 12345);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("boxes", count), &boxes, |b, boxes| {
            b.iter(|| {
                let mut tree = IntervalTree::new();
                for (i, aabb) in boxes.iter().enumerate() {
                    tree.insert(*aabb, i);
                }
                black_box(tree)
            })
        });
    }

    group.finish();
}

fn bench_tree_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_tree_search");

    for count in [1000, 10000, 50000] {
        let boxes = generate_random_boxes(count, 12345);
        let mut tree = IntervalTree::new();
        for (i, aabb) in boxes.iter().enumerate() {
            tree.insert(*aabb, i);
        }
        let queries = generate_random_boxes(1000, 54321);
        group.throughput(Throughput::Elements(1000));

        group.bench_with_input(
            BenchmarkId::new("queries_1000", count),
            &(&tree, &queries),
            |b, (tree, queries)| {
                b.iter(|| {
                    for q in queries.iter() {
                        let _ = tree.search(black_box(q));
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_planar_set_churn(c: &mut Criterion) {
    let boxes = generate_random_boxes(5000, 777);

    // Add everything, then remove every other key, as a boolean pass does
    c.bench_function("planar_set_add_remove_5000", |b| {
        b.iter(|| {
            let mut set: PlanarSet<usize, f64> = PlanarSet::new();
            for (i, aabb) in boxes.iter().enumerate() {
                set.add(i, *aabb);
            }
            for i in (0..boxes.len()).step_by(2) {
                set.remove(i);
            }
            black_box(set.len())
        })
    });
}

criterion_group!(benches, bench_tree_insert, bench_tree_search, bench_planar_set_churn);
criterion_main!(benches);
