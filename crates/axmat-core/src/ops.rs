//! Matrix arithmetic.
//!
//! Every operation allocates its result from `arena` when given, otherwise on
//! the heap, and reports failures through the arena's reporter. Operands may
//! be any mix of matrices, slices and read-only views.

use axmat_memory::Arena;
use num_traits::Zero;
use tracing::debug;

use crate::error::{fail, MatrixError};
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::view::MatrixView;

/// Element-wise sum `a + b`.
///
/// # Example
///
/// ```
/// use axmat_core::{add, Matrix};
///
/// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]], None).unwrap();
/// let sum = add(&a, &a, None).unwrap();
/// assert_eq!(sum.to_rows(), vec![vec![2.0, 4.0], vec![6.0, 8.0]]);
/// ```
pub fn add<'a, 'l, 'r>(
    a: impl Into<MatrixView<'l>>,
    b: impl Into<MatrixView<'r>>,
    arena: Option<&'a Arena>,
) -> Result<Matrix<'a>, MatrixError> {
    zip_with("add", a.into(), b.into(), arena, |x, y| x + y)
}

/// Element-wise (Hadamard) product `a ∘ b`.
pub fn elementwise_multiply<'a, 'l, 'r>(
    a: impl Into<MatrixView<'l>>,
    b: impl Into<MatrixView<'r>>,
    arena: Option<&'a Arena>,
) -> Result<Matrix<'a>, MatrixError> {
    zip_with("elementwise_multiply", a.into(), b.into(), arena, |x, y| x * y)
}

/// Matrix product `a · b`.
///
/// Requires `a.cols() == b.rows()`; the result is `a.rows() x b.cols()`.
/// Each cell accumulates `a[i,k] * b[k,j]` for ascending `k`, starting from
/// zero.
pub fn multiply<'a, 'l, 'r>(
    a: impl Into<MatrixView<'l>>,
    b: impl Into<MatrixView<'r>>,
    arena: Option<&'a Arena>,
) -> Result<Matrix<'a>, MatrixError> {
    let (a, b) = (a.into(), b.into());
    if a.cols() != b.rows() {
        return Err(fail(
            arena,
            MatrixError::DimensionMismatch {
                op: "multiply",
                left: a.shape(),
                right: b.shape(),
            },
        ));
    }

    debug!(
        left = ?a.shape(),
        right = ?b.shape(),
        "matrix multiply"
    );

    let mut out = Matrix::new_in(a.rows(), b.cols(), arena)?;
    for i in 0..a.rows() {
        let lhs = a.row_slice(i);
        let row = out.row_slice_mut(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = lhs
                .iter()
                .enumerate()
                .fold(Scalar::zero(), |acc, (k, &x)| acc + x * b[(k, j)]);
        }
    }
    Ok(out)
}

fn zip_with<'a, F>(
    op: &'static str,
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    arena: Option<&'a Arena>,
    f: F,
) -> Result<Matrix<'a>, MatrixError>
where
    F: Fn(Scalar, Scalar) -> Scalar,
{
    if a.shape() != b.shape() {
        return Err(fail(
            arena,
            MatrixError::DimensionMismatch {
                op,
                left: a.shape(),
                right: b.shape(),
            },
        ));
    }

    let mut out = Matrix::new_in(a.rows(), a.cols(), arena)?;
    for i in 0..a.rows() {
        let cells = out.row_slice_mut(i);
        for ((cell, &x), &y) in cells.iter_mut().zip(a.row_slice(i)).zip(b.row_slice(i)) {
            *cell = f(x, y);
        }
    }
    Ok(out)
}
