//! axmat library: configuration, demo driver and exit-code mapping for the
//! `axmat` binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
