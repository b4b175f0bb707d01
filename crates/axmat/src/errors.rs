//! Error handling and exit codes.

use axmat_core::MatrixError;
use axmat_memory::AllocError;

use crate::config::ConfigError;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Memory could not be allocated.
    pub const ERROR_ALLOC: i32 = 2;
    /// Operand shapes or slice ranges were invalid.
    pub const ERROR_DIMENSION: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

/// Map a matrix error to an exit code.
#[must_use]
pub fn matrix_exit_code(err: &MatrixError) -> i32 {
    match err {
        MatrixError::Alloc(_) | MatrixError::SizeOverflow { .. } => exit_codes::ERROR_ALLOC,
        MatrixError::DimensionMismatch { .. }
        | MatrixError::InvalidRange { .. }
        | MatrixError::OutOfBounds { .. } => exit_codes::ERROR_DIMENSION,
    }
}

/// Map any application error to an exit code by its root cause.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return exit_codes::ERROR_CONFIG;
        }
        if let Some(err) = cause.downcast_ref::<MatrixError>() {
            return matrix_exit_code(err);
        }
        if cause.is::<AllocError>() {
            return exit_codes::ERROR_ALLOC;
        }
    }
    exit_codes::ERROR_GENERIC
}
