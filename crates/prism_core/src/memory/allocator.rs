//! # Allocator Capability Contract
//!
//! The operation set every allocation strategy implements, plus a typed
//! convenience layer built on top of the raw byte interface.

// SAFETY: The typed convenience layer places and drops values through raw
// pointers returned by the byte-level contract. Every unsafe block is local
// to one pointer whose provenance is the allocator itself.
#![allow(unsafe_code)]

use std::mem;
use std::ptr::NonNull;

/// Common contract implemented by every allocation strategy.
///
/// Two failure classes apply to all implementations:
/// - **Capacity exhaustion** is recoverable: the call returns `None` and the
///   allocator state is left valid and unchanged.
/// - **Contract violations** (an unsupported operation, a pool size
///   mismatch, a non-power-of-two alignment) are programming errors and
///   panic rather than returning an error value.
///
/// No strategy performs internal locking: an instance has exactly one owner
/// and is driven synchronously. Telemetry units are strategy-defined: the
/// byte-oriented strategies report bytes, the pool reports slots.
pub trait Allocator {
    /// Allocates `size` bytes with no alignment requirement.
    ///
    /// Returns `None` when the backing region cannot satisfy the request.
    fn alloc(&mut self, size: usize) -> Option<NonNull<u8>> {
        self.alloc_aligned(size, 1)
    }

    /// Allocates `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two; the returned address, if any, is a
    /// multiple of it.
    fn alloc_aligned(&mut self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// Resizes an allocation, growing in place when possible.
    ///
    /// `None` as `ptr` behaves as a plain allocation. Otherwise the result
    /// is either the same pointer (resized in place), a new pointer (the
    /// old contents copied up to the smaller of the two usable sizes, the
    /// old allocation freed), or `None` on failure with the original
    /// allocation left untouched and still valid.
    ///
    /// # Safety
    ///
    /// `ptr`, when `Some`, must have been returned by this allocator and
    /// not yet deallocated.
    unsafe fn realloc(&mut self, ptr: Option<NonNull<u8>>, new_size: usize) -> Option<NonNull<u8>> {
        unsafe { self.realloc_aligned(ptr, new_size, 1) }
    }

    /// [`Allocator::realloc`] with an alignment requirement for the case
    /// where the allocation has to move.
    ///
    /// # Safety
    ///
    /// Same contract as [`Allocator::realloc`].
    unsafe fn realloc_aligned(
        &mut self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
        align: usize,
    ) -> Option<NonNull<u8>>;

    /// Returns an allocation to the strategy's free pool.
    ///
    /// A `None` pointer is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr`, when `Some`, must have been returned by this allocator and
    /// not yet deallocated. The memory must no longer be read or written
    /// after this call.
    unsafe fn dealloc(&mut self, ptr: Option<NonNull<u8>>);

    /// Currently allocated amount. Telemetry only, never affects behavior.
    fn allocated(&self) -> usize;

    /// High-water mark of [`Allocator::allocated`]. Telemetry only.
    fn max_allocated(&self) -> usize;
}

/// Typed helpers layered over the raw [`Allocator`] contract.
///
/// Blanket-implemented for every allocator, including `dyn Allocator`.
/// These are derived conveniences: size and alignment come from `T`, and
/// the construct/destruct variants run the value's constructor or `Drop`
/// around the raw call.
pub trait AllocatorExt: Allocator {
    /// Allocates storage for one `T` without initializing it.
    fn alloc_uninit<T>(&mut self) -> Option<NonNull<T>> {
        self.alloc_aligned(mem::size_of::<T>(), mem::align_of::<T>())
            .map(NonNull::cast)
    }

    /// Allocates storage for `count` contiguous `T` without initializing.
    fn alloc_array_uninit<T>(&mut self, count: usize) -> Option<NonNull<T>> {
        let bytes = mem::size_of::<T>().checked_mul(count)?;
        self.alloc_aligned(bytes, mem::align_of::<T>())
            .map(NonNull::cast)
    }

    /// Allocates storage for one `T` and moves `value` into it.
    fn alloc_value<T>(&mut self, value: T) -> Option<NonNull<T>> {
        let slot = self.alloc_uninit::<T>()?;
        // SAFETY: `slot` is freshly allocated with T's size and alignment.
        unsafe { slot.as_ptr().write(value) };
        Some(slot)
    }

    /// Resizes an array allocation to hold `count` elements.
    ///
    /// # Safety
    ///
    /// Same contract as [`Allocator::realloc`]; surviving elements are
    /// moved bytewise, so `T` must be safe to relocate (all Rust types
    /// are, absent self-referential raw pointers).
    unsafe fn realloc_array<T>(
        &mut self,
        ptr: Option<NonNull<T>>,
        count: usize,
    ) -> Option<NonNull<T>> {
        let bytes = mem::size_of::<T>().checked_mul(count)?;
        unsafe {
            self.realloc_aligned(ptr.map(NonNull::cast), bytes, mem::align_of::<T>())
                .map(NonNull::cast)
        }
    }

    /// Drops the value then returns its storage to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must point at a live `T` previously placed by this allocator,
    /// and must not be used afterwards.
    unsafe fn dealloc_value<T>(&mut self, ptr: NonNull<T>) {
        unsafe {
            ptr.as_ptr().drop_in_place();
            self.dealloc(Some(ptr.cast()));
        }
    }

    /// Drops `count` array elements then returns the storage.
    ///
    /// # Safety
    ///
    /// `ptr` must point at `count` live `T` previously placed by this
    /// allocator, and must not be used afterwards.
    unsafe fn dealloc_array<T>(&mut self, ptr: NonNull<T>, count: usize) {
        unsafe {
            for i in 0..count {
                ptr.as_ptr().add(i).drop_in_place();
            }
            self.dealloc(Some(ptr.cast()));
        }
    }
}

impl<A: Allocator + ?Sized> AllocatorExt for A {}
