//! Criterion benchmarks for matrix arithmetic.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use axmat_core::{add, multiply, Matrix, Scalar};
use axmat_memory::Arena;

#[allow(clippy::cast_precision_loss)]
fn grid<'a>(n: usize, arena: Option<&'a Arena>) -> Matrix<'a> {
    Matrix::from_fn(n, n, arena, |i, j| (i * 10 + j) as Scalar).unwrap()
}

fn bench_multiply(c: &mut Criterion) {
    let sizes: Vec<usize> = vec![8, 32, 64, 128];

    let mut group = c.benchmark_group("MultiplyHeap");
    for &n in &sizes {
        let m = grid(n, None);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| multiply(&m, &m, None).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("MultiplyArena");
    for &n in &sizes {
        let m = grid(n, None);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let arena = Arena::new(64 * 1024).unwrap();
                multiply(&m, &m, Some(&arena)).map(|p| p[(0, 0)]).unwrap()
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("MultiplyStridedView");
    for &n in &sizes {
        let m = grid(2 * n, None);
        let view = m.slice_view(n / 2..n / 2 + n, n / 2..n / 2 + n).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| multiply(view, view, None).unwrap());
        });
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("Add");
    for &n in &[32usize, 256] {
        let m = grid(n, None);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| add(&m, &m, None).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multiply, bench_add);
criterion_main!(benches);
