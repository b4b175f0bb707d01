//! Integration tests for arena growth and matrix storage across blocks.
#![allow(clippy::float_cmp)]

use axmat_core::{add, Matrix, Ownership, Scalar};
use axmat_memory::{Arena, Severity};
use axmat_tests::{collecting_arena, grid};

#[test]
fn oversized_request_gets_dedicated_block() {
    let arena = Arena::new(64).unwrap();
    let ptr = arena.alloc(1000).unwrap();
    assert!(ptr.is_some());
    assert_eq!(arena.block_count(), 2);
    let capacities = arena.block_capacities();
    assert_eq!(capacities[0], 64);
    assert!(capacities[1] >= 1000);
    assert_eq!(arena.stats().dedicated_blocks, 1);
}

#[test]
fn matrices_survive_block_growth() {
    let arena = Arena::new(64).unwrap();
    // 5x5 f64 is 200 bytes: every matrix spills into its own block.
    let a = grid(5, Some(&arena)).unwrap();
    let b = grid(5, Some(&arena)).unwrap();
    let sum = add(&a, &b, Some(&arena)).unwrap();
    assert!(arena.block_count() >= 3);
    assert_eq!(sum[(3, 2)], 64.0);
    assert_eq!(a[(4, 4)], 44.0);
    assert_eq!(b[(0, 1)], 1.0);
}

#[test]
fn many_small_matrices_share_blocks() {
    let arena = Arena::new(4096).unwrap();
    let matrices: Vec<Matrix<'_>> = (0..20)
        .map(|k| {
            Matrix::from_fn(2, 2, Some(&arena), |i, j| {
                Scalar::from(u8::try_from(k * 4 + i * 2 + j).unwrap())
            })
            .unwrap()
        })
        .collect();
    assert_eq!(arena.block_count(), 1);
    for (k, m) in matrices.iter().enumerate() {
        assert_eq!(m.ownership(), Ownership::ArenaBorrowed);
        assert_eq!(m[(1, 1)], Scalar::from(u8::try_from(k * 4 + 3).unwrap()));
    }
}

#[test]
fn zero_size_request_warns_once() {
    let (arena, reporter) = collecting_arena(64).unwrap();
    assert!(arena.alloc(0).unwrap().is_none());
    assert_eq!(reporter.count(Severity::Warn), 1);
    assert_eq!(reporter.len(), 1);
    assert_eq!(arena.used(), 0);
}

#[test]
fn failures_reach_the_arena_reporter() {
    let (arena, reporter) = collecting_arena(64).unwrap();
    let a = Matrix::zeros(2, 3).unwrap();
    let b = Matrix::zeros(3, 3).unwrap();
    assert!(add(&a, &b, Some(&arena)).is_err());
    assert!(Matrix::new_in(usize::MAX, 2, Some(&arena)).is_err());
    assert_eq!(reporter.count(Severity::Fatal), 2);
}

#[test]
fn destroy_releases_everything() {
    let arena = Arena::new(128).unwrap();
    {
        let m = grid(8, Some(&arena)).unwrap();
        assert_eq!(m[(7, 7)], 77.0);
    }
    assert!(arena.capacity() >= 128 + 8 * 8 * std::mem::size_of::<Scalar>());
    arena.destroy();
}
