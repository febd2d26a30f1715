//! # PRISM Core Allocator Framework
//!
//! Custom allocation strategies underlying the engine's resource system:
//! - Arena (bump) allocation for phase-scoped scratch memory
//! - A general-purpose free-list allocator with split/coalesce/grow/shrink
//! - Fixed-slot pools with O(1) recycling
//!
//! ## Architecture Rules
//!
//! 1. **Backing memory is caller-owned** - No strategy allocates or frees
//!    its own region; construction receives a base pointer and a size
//! 2. **Single-threaded by design** - No internal locking anywhere; one
//!    owner per allocator instance
//! 3. **Two failure classes** - Capacity exhaustion returns `None` with the
//!    allocator state untouched; contract violations panic
//!
//! ## Example
//!
//! ```rust,ignore
//! use prism_core::{Allocator, FreeListAllocator, HeapRegion};
//!
//! let mut region = HeapRegion::new(64 * 1024);
//! let mut heap = unsafe { FreeListAllocator::new(region.base(), 64 * 1024) };
//! let block = heap.alloc_aligned(256, 16);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;

pub use memory::{
    Allocator, AllocatorExt, ArenaAllocator, FreeListAllocator, HeapRegion, PoolAllocator,
    SlotIndex, MAX_FREE_LIST_ALIGN,
};
