//! Arena construction options.

use crate::constants::DEFAULT_BLOCK_SIZE;

/// Options for creating an [`Arena`](crate::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaOptions {
    /// Capacity in bytes of every regular block (0 = use the default).
    pub block_size: usize,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl ArenaOptions {
    /// Options with the given block size.
    #[must_use]
    pub fn with_block_size(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.block_size == 0 {
            self.block_size = DEFAULT_BLOCK_SIZE;
        }
        self
    }
}
