//! Dense matrices over arena, heap, or borrowed storage.
//!
//! A [`Matrix`] is described by its row count, column count, row stride and
//! storage. Fresh matrices are row-major with `row_stride == cols`; mutable
//! slices keep the parent's stride and alias its buffer, so a write through a
//! slice is a write to the parent.
//!
//! Who releases the buffer is encoded in the storage itself (see
//! [`Ownership`]). Lifetimes tie arena-backed matrices to their arena and
//! slices to their parent.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut, Range};

use axmat_memory::{AllocError, Arena, Severity};
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::{fail, reporter_for, Axis, MatrixError};
use crate::scalar::Scalar;
use crate::view::{check_range, span, sub_region, MatrixView};

/// Who is responsible for a matrix's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Heap buffer released when the matrix is destroyed or dropped.
    Owned,
    /// Space inside an arena, released with the arena.
    ArenaBorrowed,
    /// Region of another matrix's buffer.
    ViewBorrowed,
    /// No buffer; the descriptor was destroyed or never initialized.
    Released,
}

enum Storage<'a> {
    Owned(Vec<Scalar>),
    Arena(&'a mut [Scalar]),
    View(&'a mut [Scalar]),
    Released,
}

impl Storage<'_> {
    fn as_slice(&self) -> &[Scalar] {
        match self {
            Self::Owned(data) => data,
            Self::Arena(data) | Self::View(data) => data,
            Self::Released => &[],
        }
    }

    fn as_mut_slice(&mut self) -> &mut [Scalar] {
        match self {
            Self::Owned(data) => data,
            Self::Arena(data) | Self::View(data) => data,
            Self::Released => &mut [],
        }
    }

    fn ownership(&self) -> Ownership {
        match self {
            Self::Owned(_) => Ownership::Owned,
            Self::Arena(_) => Ownership::ArenaBorrowed,
            Self::View(_) => Ownership::ViewBorrowed,
            Self::Released => Ownership::Released,
        }
    }
}

/// A 2-D matrix of [`Scalar`]s.
///
/// # Example
///
/// ```
/// use axmat_core::Matrix;
/// use axmat_memory::Arena;
///
/// let arena = Arena::new(4096).unwrap();
/// let mut m = Matrix::from_fn(5, 5, Some(&arena), |i, j| (i * 10 + j) as axmat_core::Scalar).unwrap();
///
/// let mut s = m.slice(1..4, 2..5).unwrap();
/// assert_eq!(s[(0, 0)], 12.0);
/// s[(0, 0)] = 99.0;
/// assert_eq!(m[(1, 2)], 99.0);
/// ```
pub struct Matrix<'a> {
    rows: usize,
    cols: usize,
    row_stride: usize,
    storage: Storage<'a>,
}

impl<'a> Matrix<'a> {
    /// An empty descriptor with no storage, ready for [`Matrix::init`].
    #[must_use]
    pub fn released() -> Self {
        Self {
            rows: 0,
            cols: 0,
            row_stride: 0,
            storage: Storage::Released,
        }
    }

    /// Create a zero-filled `rows x cols` matrix.
    ///
    /// Storage comes from `arena` when given, otherwise from the heap.
    pub fn new_in(rows: usize, cols: usize, arena: Option<&'a Arena>) -> Result<Self, MatrixError> {
        let mut matrix = Self::released();
        matrix.init(rows, cols, arena)?;
        Ok(matrix)
    }

    /// Create a matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn<F>(
        rows: usize,
        cols: usize,
        arena: Option<&'a Arena>,
        mut f: F,
    ) -> Result<Self, MatrixError>
    where
        F: FnMut(usize, usize) -> Scalar,
    {
        let mut matrix = Self::new_in(rows, cols, arena)?;
        for i in 0..rows {
            for (j, cell) in matrix.row_slice_mut(i).iter_mut().enumerate() {
                *cell = f(i, j);
            }
        }
        Ok(matrix)
    }

    /// Create a matrix from row slices, which must all have the same length.
    pub fn from_rows<R>(data: &[R], arena: Option<&'a Arena>) -> Result<Self, MatrixError>
    where
        R: AsRef<[Scalar]>,
    {
        let cols = data.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = data.iter().find(|r| r.as_ref().len() != cols) {
            return Err(fail(
                arena,
                MatrixError::DimensionMismatch {
                    op: "from_rows",
                    left: (data.len(), cols),
                    right: (1, bad.as_ref().len()),
                },
            ));
        }
        let mut matrix = Self::new_in(data.len(), cols, arena)?;
        for (i, row) in data.iter().enumerate() {
            matrix.row_slice_mut(i).copy_from_slice(row.as_ref());
        }
        Ok(matrix)
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize, arena: Option<&'a Arena>) -> Result<Self, MatrixError> {
        let mut matrix = Self::new_in(n, n, arena)?;
        for i in 0..n {
            matrix.row_slice_mut(i)[i] = Scalar::one();
        }
        Ok(matrix)
    }

    /// (Re)initialize this descriptor with a fresh zero-filled buffer.
    ///
    /// Any buffer the descriptor owned is released first. On failure the
    /// descriptor is left unchanged.
    pub fn init(
        &mut self,
        rows: usize,
        cols: usize,
        arena: Option<&'a Arena>,
    ) -> Result<(), MatrixError> {
        let len = rows
            .checked_mul(cols)
            .filter(|len| len.checked_mul(mem::size_of::<Scalar>()).is_some())
            .ok_or_else(|| fail(arena, MatrixError::SizeOverflow { rows, cols }))?;

        let storage = match arena {
            // The arena reports its own failures.
            Some(arena) => Storage::Arena(arena.alloc_slice_fill_copy(len, Scalar::zero())?),
            None => {
                reporter_for(None).report(
                    Severity::Info,
                    &format!("matrix: no arena supplied, allocating {rows}x{cols} on the heap"),
                );
                Storage::Owned(heap_buffer(len)?)
            }
        };

        self.storage = storage;
        self.rows = rows;
        self.cols = cols;
        self.row_stride = cols;
        Ok(())
    }

    /// Create a zero-filled heap-owned matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix<'static>, MatrixError> {
        Matrix::new_in(rows, cols, None)
    }

    /// Release an owned buffer and clear the descriptor.
    ///
    /// Views and arena-backed matrices keep their storage untouched; only the
    /// descriptor is cleared. A destroyed matrix is `0 x 0` with
    /// [`Ownership::Released`].
    pub fn destroy(&mut self) {
        debug!(
            rows = self.rows,
            cols = self.cols,
            ownership = ?self.ownership(),
            "matrix destroyed"
        );
        self.storage = Storage::Released;
        self.rows = 0;
        self.cols = 0;
        self.row_stride = 0;
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Elements between the starts of consecutive rows.
    #[inline]
    #[must_use]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Shape as `(rows, cols)`.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of logical elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the matrix has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Who releases this matrix's buffer.
    #[must_use]
    pub fn ownership(&self) -> Ownership {
        self.storage.ownership()
    }

    /// Whether destroying this matrix releases its buffer.
    #[must_use]
    pub fn owns_data(&self) -> bool {
        self.ownership() == Ownership::Owned
    }

    /// A read-only view of the whole matrix.
    #[must_use]
    pub fn view(&self) -> MatrixView<'_> {
        MatrixView::from_parts(self.rows, self.cols, self.row_stride, self.storage.as_slice())
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        self.view().get(row, col)
    }

    /// Mutable reference to the element at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Scalar> {
        if row < self.rows && col < self.cols {
            let idx = row * self.row_stride + col;
            Some(&mut self.storage.as_mut_slice()[idx])
        } else {
            None
        }
    }

    /// Overwrite the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: Scalar) -> Result<(), MatrixError> {
        let (rows, cols) = self.shape();
        let cell = self
            .get_mut(row, col)
            .ok_or(MatrixError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = value;
        Ok(())
    }

    /// Row `row` as a slice of `cols` elements.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Scalar]> {
        self.view().row(row)
    }

    /// Row `row` as a mutable slice of `cols` elements.
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [Scalar]> {
        (row < self.rows).then(|| self.row_slice_mut(row))
    }

    pub(crate) fn row_slice_mut(&mut self, row: usize) -> &mut [Scalar] {
        if self.cols == 0 {
            return &mut [];
        }
        let start = row * self.row_stride;
        let end = start + self.cols;
        &mut self.storage.as_mut_slice()[start..end]
    }

    /// A mutable view of the sub-rectangle `rows x cols` (half-open ranges).
    ///
    /// The slice borrows this matrix: its `(i, j)` is this matrix's
    /// `(i + rows.start, j + cols.start)`, and it never owns memory.
    pub fn slice(
        &mut self,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<Matrix<'_>, MatrixError> {
        check_range(Axis::Row, &rows, self.rows)?;
        check_range(Axis::Column, &cols, self.cols)?;
        let region = sub_region(&rows, &cols, self.row_stride);
        let row_stride = self.row_stride;
        Ok(Matrix {
            rows: rows.len(),
            cols: cols.len(),
            row_stride,
            storage: Storage::View(&mut self.storage.as_mut_slice()[region]),
        })
    }

    /// A read-only view of the sub-rectangle `rows x cols`.
    pub fn slice_view(
        &self,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<MatrixView<'_>, MatrixError> {
        self.view().slice(rows, cols)
    }

    /// Copy every element of `src` into this matrix.
    ///
    /// Shapes must match exactly; on mismatch nothing is written. Either side
    /// may be strided. `src` cannot alias `self`, since `self` is borrowed
    /// mutably for the duration of the call.
    pub fn copy_from<'s>(&mut self, src: impl Into<MatrixView<'s>>) -> Result<(), MatrixError> {
        let src = src.into();
        if self.shape() != src.shape() {
            return Err(MatrixError::DimensionMismatch {
                op: "copy",
                left: self.shape(),
                right: src.shape(),
            });
        }
        for i in 0..self.rows {
            self.row_slice_mut(i).copy_from_slice(src.row_slice(i));
        }
        Ok(())
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: Scalar) {
        for i in 0..self.rows {
            self.row_slice_mut(i).fill(value);
        }
    }

    /// Overwrite every element with `f(view, i, j)`, in row-major order.
    ///
    /// `f` sees the matrix as it is at the time of the call, including the
    /// cells already rewritten earlier in the pass.
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(MatrixView<'_>, usize, usize) -> Scalar,
    {
        for i in 0..self.rows {
            for j in 0..self.cols {
                let value = f(self.view(), i, j);
                let idx = i * self.row_stride + j;
                self.storage.as_mut_slice()[idx] = value;
            }
        }
    }

    /// Replace every element `x` with `f(x)`.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(Scalar) -> Scalar,
    {
        for i in 0..self.rows {
            for cell in self.row_slice_mut(i) {
                *cell = f(*cell);
            }
        }
    }

    /// Copy the elements out, one `Vec` per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Scalar>> {
        self.view().to_rows()
    }

    /// Number of buffer elements this descriptor addresses.
    #[must_use]
    pub fn span(&self) -> usize {
        span(self.rows, self.cols, self.row_stride)
    }
}

fn heap_buffer(len: usize) -> Result<Vec<Scalar>, MatrixError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| {
        fail(
            None,
            MatrixError::Alloc(AllocError::OutOfMemory {
                bytes: len.saturating_mul(mem::size_of::<Scalar>()),
            }),
        )
    })?;
    data.resize(len, Scalar::zero());
    Ok(data)
}

impl<'v> From<&'v Matrix<'_>> for MatrixView<'v> {
    fn from(matrix: &'v Matrix<'_>) -> Self {
        matrix.view()
    }
}

impl<'v> From<&'v mut Matrix<'_>> for MatrixView<'v> {
    fn from(matrix: &'v mut Matrix<'_>) -> Self {
        matrix.view()
    }
}

impl Index<(usize, usize)> for Matrix<'_> {
    type Output = Scalar;

    fn index(&self, (row, col): (usize, usize)) -> &Scalar {
        self.assert_in_bounds(row, col);
        &self.storage.as_slice()[row * self.row_stride + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix<'_> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Scalar {
        self.assert_in_bounds(row, col);
        let idx = row * self.row_stride + col;
        &mut self.storage.as_mut_slice()[idx]
    }
}

impl Matrix<'_> {
    fn assert_in_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
    }
}

impl Default for Matrix<'_> {
    fn default() -> Self {
        Self::released()
    }
}

impl fmt::Debug for Matrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("row_stride", &self.row_stride)
            .field("ownership", &self.ownership())
            .finish()
    }
}
