//! Arena usage statistics.

use std::cell::Cell;

/// Snapshot of arena usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of successful non-empty allocations.
    pub allocations: u64,
    /// Sum of requested sizes (before alignment) of those allocations.
    pub bytes_requested: u64,
    /// Number of blocks in the chain, including the first one.
    pub blocks: u64,
    /// Blocks sized to a single request larger than the default block size.
    pub dedicated_blocks: u64,
    /// Zero-byte requests that were ignored.
    pub zero_size_requests: u64,
    /// Requests that failed with an error.
    pub failures: u64,
}

/// Single-threaded counters behind an arena.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    allocations: Cell<u64>,
    bytes_requested: Cell<u64>,
    blocks: Cell<u64>,
    dedicated_blocks: Cell<u64>,
    zero_size_requests: Cell<u64>,
    failures: Cell<u64>,
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get().saturating_add(by));
}

impl StatsRecorder {
    /// Take a snapshot of current stats.
    pub(crate) fn snapshot(&self) -> ArenaStats {
        ArenaStats {
            allocations: self.allocations.get(),
            bytes_requested: self.bytes_requested.get(),
            blocks: self.blocks.get(),
            dedicated_blocks: self.dedicated_blocks.get(),
            zero_size_requests: self.zero_size_requests.get(),
            failures: self.failures.get(),
        }
    }

    pub(crate) fn record_alloc(&self, size: usize) {
        bump(&self.allocations, 1);
        bump(&self.bytes_requested, size as u64);
    }

    pub(crate) fn record_block(&self, dedicated: bool) {
        bump(&self.blocks, 1);
        if dedicated {
            bump(&self.dedicated_blocks, 1);
        }
    }

    pub(crate) fn record_zero_size(&self) {
        bump(&self.zero_size_requests, 1);
    }

    pub(crate) fn record_failure(&self) {
        bump(&self.failures, 1);
    }
}
