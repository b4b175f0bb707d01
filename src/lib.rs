//! Shared fixtures for the workspace integration tests.

use std::sync::Arc;

use axmat_core::{Matrix, MatrixError, Scalar};
use axmat_memory::{AllocError, Arena, ArenaOptions, CollectingReporter, Reporter};

/// `n x n` matrix with `m[i, j] = 10 * i + j`, the demo's fill pattern.
#[allow(clippy::cast_precision_loss)]
pub fn grid<'a>(n: usize, arena: Option<&'a Arena>) -> Result<Matrix<'a>, MatrixError> {
    Matrix::from_fn(n, n, arena, |i, j| (i * 10 + j) as Scalar)
}

/// An arena whose reports are captured for inspection.
pub fn collecting_arena(block_size: usize) -> Result<(Arena, Arc<CollectingReporter>), AllocError> {
    let reporter = Arc::new(CollectingReporter::new());
    let arena = Arena::with_options(
        ArenaOptions::with_block_size(block_size),
        Arc::clone(&reporter) as Arc<dyn Reporter>,
    )?;
    Ok((arena, reporter))
}
