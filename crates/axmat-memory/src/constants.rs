//! Arena sizing and alignment constants.

/// Block size used when an arena is created with a block size of zero.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Alignment of every address handed out by an arena.
///
/// This is the strictest fundamental alignment on mainstream 64-bit targets
/// (C's `max_align_t`), so any scalar or `#[repr(C)]` aggregate of scalars can
/// be placed at an arena address.
pub const MAX_ALIGN: usize = 16;

const _: () = assert!(MAX_ALIGN.is_power_of_two());
const _: () = assert!(std::mem::align_of::<u128>() <= MAX_ALIGN);
const _: () = assert!(std::mem::align_of::<f64>() <= MAX_ALIGN);
const _: () = assert!(std::mem::align_of::<usize>() <= MAX_ALIGN);

/// Round `size` up to the next multiple of `align`.
///
/// `align` must be a power of two. Returns `None` on overflow.
///
/// ```
/// assert_eq!(axmat_memory::align_up(13, 8), Some(16));
/// assert_eq!(axmat_memory::align_up(16, 16), Some(16));
/// assert_eq!(axmat_memory::align_up(usize::MAX, 16), None);
/// ```
#[inline]
#[must_use]
pub const fn align_up(size: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    match size.checked_add(align - 1) {
        Some(padded) => Some(padded & !(align - 1)),
        None => None,
    }
}
