//! Read-only strided views.

use std::ops::{Index, Range};

use crate::error::{Axis, MatrixError};
use crate::scalar::Scalar;

/// Number of buffer elements spanned by a `rows x cols` region with the given
/// row stride: from the top-left element up to and including the bottom-right.
#[inline]
pub(crate) fn span(rows: usize, cols: usize, row_stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * row_stride + cols
    }
}

/// Check a half-open range against an extent.
pub(crate) fn check_range(
    axis: Axis,
    range: &Range<usize>,
    extent: usize,
) -> Result<(), MatrixError> {
    if range.start <= range.end && range.end <= extent {
        Ok(())
    } else {
        Err(MatrixError::InvalidRange {
            axis,
            start: range.start,
            end: range.end,
            extent,
        })
    }
}

/// Offset and span of a validated sub-rectangle inside a parent buffer.
///
/// Empty sub-rectangles map to an empty region at offset 0.
pub(crate) fn sub_region(
    rows: &Range<usize>,
    cols: &Range<usize>,
    row_stride: usize,
) -> Range<usize> {
    let len = span(rows.len(), cols.len(), row_stride);
    if len == 0 {
        return 0..0;
    }
    let offset = rows.start * row_stride + cols.start;
    offset..offset + len
}

/// A borrowed, read-only window onto matrix storage.
///
/// Element `(i, j)` lives at `data[i * row_stride + j]`. Several views of the
/// same matrix, overlapping or not, may coexist.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    rows: usize,
    cols: usize,
    row_stride: usize,
    data: &'a [Scalar],
}

impl<'a> MatrixView<'a> {
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        row_stride: usize,
        data: &'a [Scalar],
    ) -> Self {
        debug_assert!(data.len() >= span(rows, cols, row_stride));
        Self {
            rows,
            cols,
            row_stride,
            data,
        }
    }

    /// View a contiguous row-major buffer as a `rows x cols` matrix.
    ///
    /// Fails with `DimensionMismatch` unless `data.len() == rows * cols`.
    pub fn from_slice(data: &'a [Scalar], rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatrixError::DimensionMismatch {
                op: "from_slice",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self::from_parts(rows, cols, cols, data))
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

    /// Whether the view has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether rows are stored back to back.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.row_stride == self.cols || self.rows <= 1
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.row_stride + col])
    }

    /// Row `row` as a slice of `cols` elements.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&'a [Scalar]> {
        (row < self.rows).then(|| self.row_slice(row))
    }

    pub(crate) fn row_slice(&self, row: usize) -> &'a [Scalar] {
        if self.cols == 0 {
            return &[];
        }
        let start = row * self.row_stride;
        &self.data[start..start + self.cols]
    }

    /// Iterate over elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + 'a {
        let view = *self;
        (0..view.rows).flat_map(move |i| view.row_slice(i).iter().copied())
    }

    /// Copy the elements out, one `Vec` per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Scalar>> {
        (0..self.rows).map(|i| self.row_slice(i).to_vec()).collect()
    }

    /// A view of the sub-rectangle `rows x cols` (half-open ranges).
    ///
    /// The result shares this view's storage and row stride; its `(0, 0)` is
    /// this view's `(rows.start, cols.start)`.
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self, MatrixError> {
        check_range(Axis::Row, &rows, self.rows)?;
        check_range(Axis::Column, &cols, self.cols)?;
        let region = sub_region(&rows, &cols, self.row_stride);
        Ok(Self::from_parts(
            rows.len(),
            cols.len(),
            self.row_stride,
            &self.data[region],
        ))
    }
}

impl Index<(usize, usize)> for MatrixView<'_> {
    type Output = Scalar;

    fn index(&self, (row, col): (usize, usize)) -> &Scalar {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.row_stride + col]
    }
}

impl<'a> From<&MatrixView<'a>> for MatrixView<'a> {
    fn from(view: &MatrixView<'a>) -> Self {
        *view
    }
}
