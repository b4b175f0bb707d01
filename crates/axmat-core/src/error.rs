//! Matrix errors and failure reporting.

use std::fmt;

use axmat_memory::{AllocError, Arena, Reporter, Severity, TracingReporter};

/// Axis of a matrix, used in range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row axis.
    Row,
    /// Column axis.
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Row => "row",
            Self::Column => "column",
        })
    }
}

/// Error type for matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Storage for the matrix could not be allocated.
    #[error("allocation failed: {0}")]
    Alloc(#[from] AllocError),

    /// Operand shapes are incompatible for the operation.
    #[error("{op}: dimension mismatch ({}x{} vs {}x{})", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        /// Operation that was attempted.
        op: &'static str,
        /// Shape of the left operand (or destination).
        left: (usize, usize),
        /// Shape of the right operand (or source).
        right: (usize, usize),
    },

    /// A slice range is reversed or exceeds the matrix extent.
    #[error("invalid {axis} range {start}..{end} for extent {extent}")]
    InvalidRange {
        /// Axis the range applies to.
        axis: Axis,
        /// Inclusive start.
        start: usize,
        /// Exclusive end.
        end: usize,
        /// Number of rows or columns available.
        extent: usize,
    },

    /// An element index is outside the matrix.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Row count of the matrix.
        rows: usize,
        /// Column count of the matrix.
        cols: usize,
    },

    /// `rows * cols` elements cannot be addressed.
    #[error("{rows}x{cols} matrix exceeds addressable memory")]
    SizeOverflow {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
}

static TRACING: TracingReporter = TracingReporter;

/// The reporter for an operation: the arena's when there is one.
pub(crate) fn reporter_for(arena: Option<&Arena>) -> &dyn Reporter {
    match arena {
        Some(arena) => arena.reporter(),
        None => &TRACING,
    }
}

/// Report `err` as fatal and hand it back for returning.
pub(crate) fn fail(arena: Option<&Arena>, err: MatrixError) -> MatrixError {
    reporter_for(arena).report(Severity::Fatal, &format!("matrix: {err}"));
    err
}
