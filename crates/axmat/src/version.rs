//! Version information.

use axmat_core::SCALAR_NAME;

/// Get the version string.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get the full version string with the configured scalar type.
#[must_use]
pub fn full_version() -> String {
    format!("axmat {} ({SCALAR_NAME} scalars)", version())
}
