//! # axmat-memory
//!
//! Memory management for the `axmat` workspace.
//!
//! Provides a bump arena that serves aligned allocations from a chain of
//! fixed-capacity blocks and releases them all at once, together with the
//! failure-reporting capability shared by every `axmat` crate.
#![warn(missing_docs)]

#[allow(unsafe_code)]
pub mod arena;
pub mod constants;
pub mod error;
pub mod options;
pub mod report;
pub mod stats;

// Re-exports
pub use arena::Arena;
pub use constants::{align_up, DEFAULT_BLOCK_SIZE, MAX_ALIGN};
pub use error::AllocError;
pub use options::ArenaOptions;
pub use report::{CollectingReporter, NoOpReporter, Report, Reporter, Severity, TracingReporter};
pub use stats::ArenaStats;
