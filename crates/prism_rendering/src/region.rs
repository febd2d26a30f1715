//! # GPU Region Carving
//!
//! Linear offset allocation inside a pre-committed device buffer.

/// Carves sub-ranges out of one externally-owned device buffer.
///
/// The buffer itself is committed once, elsewhere, at a fixed size; this
/// allocator only hands out byte offsets into it, cursor-style. Nothing is
/// ever reclaimed - the regions hold immutable mesh data for the lifetime
/// of the scene.
///
/// Requests past the configured capacity are refused rather than silently
/// letting the caller write beyond the buffer it committed.
#[derive(Debug, Clone)]
pub struct GpuRegionAllocator {
    /// Size of the device buffer being carved.
    capacity: u64,
    /// Next unclaimed offset; only grows.
    cursor: u64,
}

impl GpuRegionAllocator {
    /// Creates an allocator over a device buffer of `capacity` bytes.
    #[must_use]
    pub const fn new(capacity: u64) -> Self {
        Self {
            capacity,
            cursor: 0,
        }
    }

    /// Claims the next `size` bytes, returning their starting offset.
    ///
    /// Returns `None` when the region cannot hold the request; the cursor
    /// is left untouched so smaller requests may still succeed.
    pub fn allocate(&mut self, size: u64) -> Option<u64> {
        let end = self.cursor.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        let start = self.cursor;
        self.cursor = end;
        Some(start)
    }

    /// Bytes claimed so far.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.cursor
    }

    /// Bytes still unclaimed.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.capacity - self.cursor
    }

    /// Size of the underlying device buffer.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }
}
