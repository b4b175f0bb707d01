//! Application configuration from CLI flags and environment.

use clap::Parser;

use axmat_memory::DEFAULT_BLOCK_SIZE;

/// Largest supported `--size`; bounds the demo's output and its arena use.
pub const MAX_SIZE: usize = 1024;

/// Largest supported `--precision`.
pub const MAX_PRECISION: usize = 17;

/// axmat: arena-backed matrices with aliasing slices.
///
/// Runs the slice/copy demo: fills an arena matrix, writes through a slice
/// of it, copies the slice into a heap matrix and prints the results.
#[derive(Parser, Debug, Clone)]
#[command(name = "axmat", version, about)]
pub struct AppConfig {
    /// Side length of the square demo matrices.
    #[arg(short, long, default_value_t = 5, env = "AXMAT_SIZE")]
    pub size: usize,

    /// Arena block size in bytes (0 selects the default).
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, env = "AXMAT_BLOCK_SIZE")]
    pub block_size: usize,

    /// Decimal places when printing matrices.
    #[arg(short, long, default_value_t = 1)]
    pub precision: usize,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (only print the checked cells).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `--size` outside `1..=MAX_SIZE`.
    #[error("size must be between 1 and {MAX_SIZE}, got {0}")]
    InvalidSize(usize),

    /// `--precision` above `MAX_PRECISION`.
    #[error("precision must be at most {MAX_PRECISION}, got {0}")]
    InvalidPrecision(usize),
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Check value ranges clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size > MAX_SIZE {
            return Err(ConfigError::InvalidSize(self.size));
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        Ok(())
    }
}
