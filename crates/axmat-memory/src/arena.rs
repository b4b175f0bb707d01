//! Bump arena built from a chain of fixed-capacity blocks.
//!
//! Allocations are served by bumping an offset inside the most recently
//! appended block. When a request does not fit, a new block of
//! `max(aligned request, default block size)` bytes is appended and becomes
//! the current one, so an oversized request always gets a block of its own.
//! Nothing is released until the arena itself is dropped.
//!
//! Every address handed out is aligned to [`MAX_ALIGN`]. Typed helpers
//! return slices that borrow the arena, so the compiler rejects any use of
//! arena memory after the arena is gone.

use std::alloc::{self, Layout};
use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::Arc;

use tracing::debug;

use crate::constants::{align_up, MAX_ALIGN};
use crate::error::AllocError;
use crate::options::ArenaOptions;
use crate::report::{Reporter, Severity, TracingReporter};
use crate::stats::{ArenaStats, StatsRecorder};

/// One contiguous region owned by an arena.
///
/// # Invariants
///
/// - `memory` was returned by the global allocator for `layout`
/// - `used <= layout.size()`, and `used` never decreases
struct Block {
    memory: NonNull<u8>,
    layout: Layout,
    used: usize,
}

impl Block {
    fn new(capacity: usize) -> Result<Self, AllocError> {
        debug_assert!(capacity > 0, "blocks are never empty");
        let layout = Layout::from_size_align(capacity, MAX_ALIGN).map_err(|_| {
            AllocError::InvalidLayout {
                size: capacity,
                align: MAX_ALIGN,
            }
        })?;

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let memory = NonNull::new(raw).ok_or(AllocError::OutOfMemory { bytes: capacity })?;

        Ok(Self {
            memory,
            layout,
            used: 0,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Reserve `aligned_size` bytes at the next aligned offset, if they fit.
    #[inline]
    fn try_bump(&mut self, aligned_size: usize) -> Option<NonNull<u8>> {
        let offset = align_up(self.used, MAX_ALIGN)?;
        let end = offset.checked_add(aligned_size)?;
        if end > self.capacity() {
            return None;
        }
        self.used = end;
        debug_assert!(self.used <= self.capacity());

        // SAFETY: `offset < end <= capacity`, so the address stays inside the
        // block allocation and cannot be null.
        Some(unsafe { NonNull::new_unchecked(self.memory.as_ptr().add(offset)) })
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `memory` was allocated in `Block::new` with exactly `layout`.
        unsafe { alloc::dealloc(self.memory.as_ptr(), self.layout) };
    }
}

/// Bump arena over a growable chain of blocks.
///
/// The first element of the chain is the head; the last is the block that
/// receives new allocations. Blocks are appended, never removed or resized.
///
/// # Example
///
/// ```
/// use axmat_memory::Arena;
///
/// let arena = Arena::new(64).unwrap();
/// let small = arena.alloc_slice_fill_copy(4, 0u32).unwrap();
/// small[0] = 7;
///
/// // Larger than a block: served from a dedicated block.
/// let big = arena.alloc(1000).unwrap();
/// assert!(big.is_some());
/// assert_eq!(arena.block_count(), 2);
/// assert_eq!(small[0], 7);
/// ```
pub struct Arena {
    blocks: RefCell<Vec<Block>>,
    default_block_size: usize,
    reporter: Arc<dyn Reporter>,
    stats: StatsRecorder,
}

// SAFETY: an `Arena` exclusively owns its blocks, and all handed-out memory
// borrows the arena, so moving it to another thread moves nothing that is
// still referenced. It stays `!Sync` through `RefCell`.
unsafe impl Send for Arena {}

impl Arena {
    /// Create an arena whose blocks hold `default_block_size` bytes
    /// (4096 when zero), reporting through `tracing`.
    pub fn new(default_block_size: usize) -> Result<Self, AllocError> {
        Self::with_options(
            ArenaOptions::with_block_size(default_block_size),
            Arc::new(TracingReporter),
        )
    }

    /// Create an arena from options with an injected reporter.
    ///
    /// The first block is allocated eagerly; failing to obtain it is reported
    /// as fatal and returned as an error.
    pub fn with_options(
        options: ArenaOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, AllocError> {
        let options = options.normalize();
        let first = Block::new(options.block_size).map_err(|err| {
            reporter.report(
                Severity::Fatal,
                &format!("arena: failed to create first block: {err}"),
            );
            err
        })?;

        let stats = StatsRecorder::default();
        stats.record_block(false);
        debug!(block_size = options.block_size, "arena created");

        Ok(Self {
            blocks: RefCell::new(vec![first]),
            default_block_size: options.block_size,
            reporter,
            stats,
        })
    }

    /// Allocate `size` bytes aligned to [`MAX_ALIGN`].
    ///
    /// A zero-byte request allocates nothing, reports a warning and returns
    /// `Ok(None)`. The returned memory is uninitialized and stays valid until
    /// the arena is dropped.
    pub fn alloc(&self, size: usize) -> Result<Option<NonNull<u8>>, AllocError> {
        if size == 0 {
            self.stats.record_zero_size();
            self.reporter.report(Severity::Warn, "arena: requested 0 bytes (ignored)");
            return Ok(None);
        }
        self.alloc_nonzero(size).map(Some)
    }

    /// Allocate a slice of `len` copies of `value`.
    ///
    /// `T` must not require more than [`MAX_ALIGN`] alignment. An empty
    /// slice does not touch the block chain.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_fill_copy<T: Copy>(
        &self,
        len: usize,
        value: T,
    ) -> Result<&mut [T], AllocError> {
        let data = self.alloc_array::<T>(len)?.as_ptr();

        // SAFETY: `data` is valid for `len` writes of `T` (or dangling with a
        // zero-sized layout), properly aligned, and not aliased by any other
        // allocation. It lives as long as `&self`.
        unsafe {
            for i in 0..len {
                data.add(i).write(value);
            }
            Ok(slice::from_raw_parts_mut(data, len))
        }
    }

    /// Allocate a copy of `src`.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> Result<&mut [T], AllocError> {
        let data = self.alloc_array::<T>(src.len())?.as_ptr();

        // SAFETY: as in `alloc_slice_fill_copy`; the fresh region cannot
        // overlap `src`, which is borrowed from elsewhere.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), data, src.len());
            Ok(slice::from_raw_parts_mut(data, src.len()))
        }
    }

    /// The size of regular blocks in bytes.
    #[inline]
    #[must_use]
    pub fn default_block_size(&self) -> usize {
        self.default_block_size
    }

    /// Number of blocks in the chain.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Capacity of every block, head first.
    #[must_use]
    pub fn block_capacities(&self) -> Vec<usize> {
        self.blocks.borrow().iter().map(Block::capacity).collect()
    }

    /// Total capacity of all blocks in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.blocks.borrow().iter().map(Block::capacity).sum()
    }

    /// Bytes consumed across all blocks, alignment padding included.
    #[must_use]
    pub fn used(&self) -> usize {
        self.blocks.borrow().iter().map(|b| b.used).sum()
    }

    /// Get a snapshot of arena statistics.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        self.stats.snapshot()
    }

    /// The reporter events of this arena go to.
    #[must_use]
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Shared handle to the reporter, for arenas created alongside this one.
    #[must_use]
    pub fn reporter_handle(&self) -> Arc<dyn Reporter> {
        Arc::clone(&self.reporter)
    }

    /// Release every block at once.
    ///
    /// Equivalent to dropping the arena; additionally logs the final usage.
    #[allow(clippy::needless_pass_by_value)]
    pub fn destroy(self) {
        let stats = self.stats();
        debug!(
            blocks = stats.blocks,
            allocations = stats.allocations,
            bytes_requested = stats.bytes_requested,
            capacity = self.capacity(),
            "arena destroyed"
        );
    }

    fn alloc_array<T>(&self, len: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(len).map_err(|_| {
            self.fail(AllocError::InvalidLayout {
                size: len.saturating_mul(mem::size_of::<T>()),
                align: mem::align_of::<T>(),
            })
        })?;
        if layout.align() > MAX_ALIGN {
            return Err(self.fail(AllocError::InvalidLayout {
                size: layout.size(),
                align: layout.align(),
            }));
        }
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.alloc_nonzero(layout.size()).map(NonNull::cast)
    }

    fn alloc_nonzero(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let Some(aligned_size) = align_up(size, MAX_ALIGN) else {
            return Err(self.fail(AllocError::InvalidLayout {
                size,
                align: MAX_ALIGN,
            }));
        };

        let mut blocks = self.blocks.borrow_mut();
        if let Some(ptr) = blocks.last_mut().and_then(|b| b.try_bump(aligned_size)) {
            self.stats.record_alloc(size);
            return Ok(ptr);
        }

        let dedicated = aligned_size > self.default_block_size;
        let capacity = aligned_size.max(self.default_block_size);
        let mut block = Block::new(capacity).map_err(|err| self.fail(err))?;
        block.used = aligned_size;
        let ptr = block.memory;

        blocks.push(block);
        self.stats.record_block(dedicated);
        self.stats.record_alloc(size);
        debug!(
            capacity,
            dedicated,
            blocks = blocks.len(),
            "arena grew by one block"
        );
        Ok(ptr)
    }

    fn fail(&self, err: AllocError) -> AllocError {
        self.stats.record_failure();
        self.reporter.report(Severity::Fatal, &format!("arena: {err}"));
        err
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("default_block_size", &self.default_block_size)
            .field("blocks", &self.block_count())
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use crate::DEFAULT_BLOCK_SIZE;

    fn collecting(block_size: usize) -> (Arena, Arc<CollectingReporter>) {
        let reporter = Arc::new(CollectingReporter::new());
        let arena = Arena::with_options(
            ArenaOptions::with_block_size(block_size),
            Arc::clone(&reporter) as Arc<dyn Reporter>,
        )
        .unwrap();
        (arena, reporter)
    }

    fn addr(ptr: Option<NonNull<u8>>) -> usize {
        ptr.unwrap().as_ptr() as usize
    }

    #[test]
    fn create_with_one_block() {
        let arena = Arena::new(1024).unwrap();
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.capacity(), 1024);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.default_block_size(), 1024);
    }

    #[test]
    fn zero_block_size_falls_back_to_default() {
        let arena = Arena::new(0).unwrap();
        assert_eq!(arena.default_block_size(), DEFAULT_BLOCK_SIZE);
        assert_eq!(arena.capacity(), DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn tiny_block_size_is_kept() {
        let arena = Arena::new(1).unwrap();
        assert_eq!(arena.default_block_size(), 1);
        let p = arena.alloc(1).unwrap();
        assert_eq!(addr(p) % MAX_ALIGN, 0);
        assert_eq!(arena.block_count(), 2);
    }

    #[test]
    fn zero_size_request_warns_and_allocates_nothing() {
        let (arena, reporter) = collecting(256);
        assert!(arena.alloc(0).unwrap().is_none());
        assert_eq!(arena.used(), 0);
        assert_eq!(reporter.count(Severity::Warn), 1);
        assert_eq!(arena.stats().zero_size_requests, 1);
        assert_eq!(arena.stats().allocations, 0);
    }

    #[test]
    fn allocations_are_aligned() {
        let arena = Arena::new(4096).unwrap();
        for size in [1, 3, 7, 8, 15, 16, 17, 33, 100] {
            let p = arena.alloc(size).unwrap();
            assert_eq!(addr(p) % MAX_ALIGN, 0, "size {size}");
        }
    }

    #[test]
    fn allocations_bump_within_block() {
        let arena = Arena::new(256).unwrap();
        let a = addr(arena.alloc(10).unwrap());
        let b = addr(arena.alloc(10).unwrap());
        assert_eq!(b - a, 16);
        assert_eq!(arena.used(), 32);
        assert_eq!(arena.block_count(), 1);
    }

    #[test]
    fn exact_fit_stays_in_block() {
        let arena = Arena::new(64).unwrap();
        arena.alloc(32).unwrap();
        arena.alloc(32).unwrap();
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.used(), 64);
    }

    #[test]
    fn overflow_appends_default_sized_block() {
        let arena = Arena::new(64).unwrap();
        arena.alloc(48).unwrap();
        arena.alloc(32).unwrap();
        assert_eq!(arena.block_capacities(), vec![64, 64]);
        assert_eq!(arena.stats().dedicated_blocks, 0);
    }

    #[test]
    fn oversized_request_gets_dedicated_block() {
        let arena = Arena::new(64).unwrap();
        let p = arena.alloc(1000).unwrap();
        assert!(p.is_some());
        assert_eq!(arena.block_count(), 2);
        assert_eq!(arena.block_capacities()[1], 1008);
        assert_eq!(arena.stats().dedicated_blocks, 1);
    }

    #[test]
    fn new_block_becomes_current() {
        let arena = Arena::new(64).unwrap();
        arena.alloc(1000).unwrap();
        // The dedicated block is full; the next request opens another block
        // rather than going back to the head.
        arena.alloc(16).unwrap();
        assert_eq!(arena.block_capacities(), vec![64, 1008, 64]);
        assert_eq!(arena.used(), 1008 + 16);
    }

    #[test]
    fn typed_slices_are_initialized_and_independent() {
        let arena = Arena::new(128).unwrap();
        let a = arena.alloc_slice_fill_copy(10, 1.5f64).unwrap();
        let b = arena.alloc_slice_fill_copy(10, 0u8).unwrap();
        a[9] = 2.0;
        b[0] = 42;
        assert!(a[..9].iter().all(|&x| (x - 1.5).abs() < f64::EPSILON));
        assert!((a[9] - 2.0).abs() < f64::EPSILON);
        assert_eq!(b[0], 42);
        assert!(b[1..].iter().all(|&x| x == 0));
    }

    #[test]
    fn alloc_slice_copy_copies() {
        let arena = Arena::new(128).unwrap();
        let copy = arena.alloc_slice_copy(&[1u32, 2, 3]).unwrap();
        copy[1] = 20;
        assert_eq!(copy, &[1, 20, 3]);
    }

    #[test]
    fn empty_slice_does_not_allocate() {
        let arena = Arena::new(128).unwrap();
        let empty = arena.alloc_slice_fill_copy(0, 0u64).unwrap();
        assert!(empty.is_empty());
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.stats().allocations, 0);
    }

    #[test]
    fn over_aligned_type_is_rejected() {
        #[derive(Clone, Copy, Debug)]
        #[repr(align(64))]
        struct Wide(#[allow(dead_code)] u8);

        let (arena, reporter) = collecting(256);
        let err = arena.alloc_slice_fill_copy(1, Wide(0)).unwrap_err();
        assert_eq!(err, AllocError::InvalidLayout { size: 64, align: 64 });
        assert_eq!(reporter.count(Severity::Fatal), 1);
        assert_eq!(arena.stats().failures, 1);
    }

    #[test]
    fn overflowing_request_is_invalid_layout() {
        let (arena, reporter) = collecting(256);
        let err = arena.alloc(usize::MAX).unwrap_err();
        assert!(matches!(err, AllocError::InvalidLayout { .. }));
        assert_eq!(reporter.count(Severity::Fatal), 1);
        // The arena is still usable afterwards.
        assert!(arena.alloc(8).unwrap().is_some());
    }

    #[test]
    fn exhausted_system_memory_is_out_of_memory() {
        let (arena, reporter) = collecting(256);
        let err = arena.alloc(1usize << 47).unwrap_err();
        assert!(matches!(err, AllocError::OutOfMemory { .. }));
        assert_eq!(reporter.count(Severity::Fatal), 1);
        assert_eq!(arena.stats().failures, 1);
        assert_eq!(arena.block_count(), 1);
        assert!(arena.alloc(8).unwrap().is_some());
    }

    #[test]
    fn huge_slice_is_invalid_layout() {
        let arena = Arena::new(256).unwrap();
        let err = arena.alloc_slice_fill_copy(usize::MAX / 2, 0u64).unwrap_err();
        assert!(matches!(err, AllocError::InvalidLayout { .. }));
    }

    #[test]
    fn stats_track_requests() {
        let arena = Arena::new(64).unwrap();
        arena.alloc(10).unwrap();
        arena.alloc(100).unwrap();
        arena.alloc(0).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.bytes_requested, 110);
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.zero_size_requests, 1);
    }

    #[test]
    fn destroy_consumes_arena() {
        let arena = Arena::new(64).unwrap();
        arena.alloc(1000).unwrap();
        arena.destroy();
    }

    #[test]
    fn debug_shows_usage() {
        let arena = Arena::new(64).unwrap();
        let text = format!("{arena:?}");
        assert!(text.contains("default_block_size: 64"));
        assert!(text.contains("blocks: 1"));
    }
}
