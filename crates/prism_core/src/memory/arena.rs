//! # Arena Allocator
//!
//! Bump allocation over a caller-owned region, freed all at once.

// SAFETY: This module does raw pointer arithmetic inside the caller-owned
// backing region. Every computed address is bounds-checked against the
// region before it is handed out.
#![allow(unsafe_code)]

use std::ptr::NonNull;

use super::align_up;
use super::allocator::Allocator;

/// A bump-pointer arena over caller-owned memory.
///
/// Allocation just advances a cursor; individual allocations can never be
/// returned. [`ArenaAllocator::clear`] resets the whole arena at a phase
/// boundary (end of frame, end of load step), at which point every pointer
/// previously handed out becomes invalid without notice to its holder.
///
/// # Thread Safety
///
/// NOT thread-safe. One arena per owner.
///
/// # Example
///
/// ```rust,ignore
/// let mut region = HeapRegion::new(1024 * 1024);
/// let mut arena = unsafe { ArenaAllocator::new(region.base(), region.len()) };
///
/// let scratch = arena.alloc_aligned(4096, 16);
/// // ... load step ...
/// arena.clear();
/// ```
pub struct ArenaAllocator {
    /// Start of the caller-owned backing region.
    base: NonNull<u8>,
    /// Total capacity in bytes.
    total: usize,
    /// Current cursor; only grows until [`ArenaAllocator::clear`].
    used: usize,
    /// Peak usage captured at phase boundaries. Diagnostic only.
    max_used: usize,
}

impl ArenaAllocator {
    /// Creates an arena over `size` bytes starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point at `size` bytes of writable memory that outlives
    /// every use of this arena and is not touched by anything else while
    /// the arena manages it.
    #[must_use]
    pub const unsafe fn new(base: NonNull<u8>, size: usize) -> Self {
        Self {
            base,
            total: size,
            used: 0,
            max_used: 0,
        }
    }

    /// Total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.total
    }

    /// Remaining free space in bytes.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.total - self.used
    }

    /// Resets the arena, invalidating all previous allocations.
    ///
    /// This is the phase boundary: the peak usage of the finished phase is
    /// folded into the watermark reported by
    /// [`ArenaAllocator::max_allocated`], then the cursor returns to zero.
    /// No memory is freed or reallocated.
    #[inline]
    pub fn clear(&mut self) {
        if self.used > self.max_used {
            self.max_used = self.used;
        }
        self.used = 0;
    }
}

impl Allocator for ArenaAllocator {
    fn alloc(&mut self, size: usize) -> Option<NonNull<u8>> {
        if self.used.checked_add(size)? > self.total {
            return None;
        }
        // SAFETY: used + size is within the backing region per the check
        // above, and base is non-null, so the sum is too.
        let p = unsafe { NonNull::new_unchecked(self.base.as_ptr().add(self.used)) };
        self.used += size;
        Some(p)
    }

    fn alloc_aligned(&mut self, size: usize, align: usize) -> Option<NonNull<u8>> {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        let top = self.base.as_ptr() as usize + self.used;
        let pad = align_up(top, align) - top;
        if self.used.checked_add(size)?.checked_add(pad)? > self.total {
            // Nothing was committed, so there is nothing to roll back.
            return None;
        }
        self.used += size + pad;
        // SAFETY: top + pad is within the region per the check above.
        Some(unsafe { NonNull::new_unchecked((top + pad) as *mut u8) })
    }

    unsafe fn realloc_aligned(
        &mut self,
        _ptr: Option<NonNull<u8>>,
        _new_size: usize,
        _align: usize,
    ) -> Option<NonNull<u8>> {
        panic!("realloc not supported for ArenaAllocator");
    }

    unsafe fn dealloc(&mut self, _ptr: Option<NonNull<u8>>) {
        panic!("dealloc not supported for ArenaAllocator");
    }

    fn allocated(&self) -> usize {
        self.used
    }

    fn max_allocated(&self) -> usize {
        self.max_used
    }
}
