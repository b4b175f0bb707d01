//! The slice/copy walkthrough on a 5x5 matrix, end to end.
#![allow(clippy::float_cmp)]

use axmat_core::{add, multiply, Matrix, MatrixError, Ownership, Scalar};
use axmat_memory::Arena;
use axmat_tests::grid;

#[test]
fn slice_write_copy_and_arithmetic() {
    let arena = Arena::new(4096).unwrap();
    let mut m = grid(5, Some(&arena)).unwrap();
    let mut heap = Matrix::zeros(5, 5).unwrap();
    assert_eq!(m.ownership(), Ownership::ArenaBorrowed);
    assert_eq!(heap.ownership(), Ownership::Owned);

    {
        let mut s = m.slice(1..4, 2..5).unwrap();
        assert_eq!(s.ownership(), Ownership::ViewBorrowed);
        assert_eq!(s[(0, 0)], 12.0);
        assert_eq!(s[(2, 2)], 34.0);

        s[(0, 0)] = 99.0;
        s[(2, 2)] = 55.0;

        let mut target = heap.slice(2..5, 2..5).unwrap();
        target.copy_from(&s).unwrap();
        assert_eq!(target.to_rows(), s.to_rows());
    }

    assert_eq!(m[(1, 2)], 99.0);
    assert_eq!(m[(3, 4)], 55.0);
    assert_eq!(heap[(2, 2)], 99.0);
    assert_eq!(heap[(4, 4)], 55.0);
    assert_eq!(heap[(1, 1)], 0.0);

    let original = grid(5, None).unwrap();
    let sum = add(&original, &original, Some(&arena)).unwrap();
    assert_eq!(sum[(3, 2)], 64.0);

    let product = multiply(&original, &original, Some(&arena)).unwrap();
    let expected: Scalar = (0..5).map(|k| original[(0, k)] * original[(k, 4)]).sum();
    assert_eq!(product[(0, 4)], expected);

    heap.destroy();
    assert_eq!(heap.shape(), (0, 0));
    assert_eq!(heap.ownership(), Ownership::Released);
}

#[test]
fn overlapping_read_views_coexist() {
    let m = grid(5, None).unwrap();
    let upper = m.slice_view(0..3, 0..3).unwrap();
    let lower = m.slice_view(2..5, 2..5).unwrap();
    assert_eq!(upper[(2, 2)], lower[(0, 0)]);
    let sum = add(upper, lower, None).unwrap();
    assert_eq!(sum[(2, 2)], 66.0);
}

#[test]
fn out_of_range_slice_is_rejected() {
    let mut m = grid(5, None).unwrap();
    assert!(matches!(
        m.slice(3..6, 0..2),
        Err(MatrixError::InvalidRange { .. })
    ));
    assert!(matches!(
        m.slice_view(0..2, 4..7),
        Err(MatrixError::InvalidRange { .. })
    ));
}

#[test]
fn copy_shape_mismatch_leaves_destination() {
    let src = grid(3, None).unwrap();
    let mut dst = grid(4, None).unwrap();
    let before = dst.to_rows();
    assert!(dst.copy_from(&src).is_err());
    assert_eq!(dst.to_rows(), before);
}

#[test]
fn map_builds_prefix_sums_along_rows() {
    let mut m = grid(3, None).unwrap();
    m.map(|view, i, j| {
        if j == 0 {
            view[(i, 0)]
        } else {
            view[(i, j - 1)] + view[(i, j)]
        }
    });
    assert_eq!(
        m.to_rows(),
        vec![
            vec![0.0, 1.0, 3.0],
            vec![10.0, 21.0, 33.0],
            vec![20.0, 41.0, 63.0]
        ]
    );
}
