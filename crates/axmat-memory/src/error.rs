//! Allocation errors.

/// Error type for arena allocations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// The system allocator could not supply a block.
    #[error("out of memory: failed to allocate a {bytes}-byte block")]
    OutOfMemory {
        /// Size of the block that could not be obtained.
        bytes: usize,
    },

    /// The request cannot be described as a valid layout (size overflow, or an
    /// alignment stricter than the arena guarantees).
    #[error("invalid layout: {size} bytes aligned to {align}")]
    InvalidLayout {
        /// Requested size in bytes (saturated on overflow).
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = AllocError::OutOfMemory { bytes: 4096 };
        assert_eq!(err.to_string(), "out of memory: failed to allocate a 4096-byte block");

        let err = AllocError::InvalidLayout { size: 8, align: 64 };
        assert_eq!(err.to_string(), "invalid layout: 8 bytes aligned to 64");
    }
}
