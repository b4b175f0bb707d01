//! # axmat-core
//!
//! Dense two-dimensional matrices over arena or heap storage.
//!
//! A [`Matrix`] either owns a heap buffer, borrows space from an
//! [`Arena`](axmat_memory::Arena), or is a strided slice of another matrix.
//! Slices alias their parent, so writes through a slice are visible in the
//! parent. Arithmetic ([`add`], [`elementwise_multiply`], [`multiply`]) works
//! on any mix of matrices and views and respects row strides.
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod matrix;
pub mod ops;
pub mod scalar;
pub mod view;

// Re-exports
pub use error::{Axis, MatrixError};
pub use matrix::{Matrix, Ownership};
pub use ops::{add, elementwise_multiply, multiply};
pub use scalar::{Scalar, SCALAR_NAME};
pub use view::MatrixView;
