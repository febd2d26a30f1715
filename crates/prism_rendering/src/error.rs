//! # Resource System Error Types
//!
//! All recoverable failures of the resource pipeline. Contract violations
//! inside the allocator framework panic instead - see `prism_core`.

use thiserror::Error;

/// Errors that can occur while loading resources.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Reading asset bytes failed.
    #[error("asset I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The asset does not start with the baked-container tag.
    #[error("unrecognized asset tag {found:?}")]
    BadAssetTag {
        /// The eight bytes found where the tag should be.
        found: [u8; 8],
    },

    /// The asset ended before its declared payload.
    #[error("truncated asset: expected {expected} bytes, got {actual}")]
    TruncatedAsset {
        /// Bytes the prelude promised.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// A pre-committed device buffer has no room for the payload.
    #[error("{region} region exhausted: requested {requested} bytes, {remaining} remaining")]
    GpuRegionExhausted {
        /// Which region refused the request.
        region: &'static str,
        /// Bytes requested.
        requested: u64,
        /// Bytes still unclaimed in the region.
        remaining: u64,
    },

    /// The load-scratch arena has no room for the staged payload.
    #[error("scratch arena exhausted: requested {requested} bytes")]
    ScratchExhausted {
        /// Bytes requested for staging.
        requested: usize,
    },

    /// The component store has no free slots.
    #[error("component store full: capacity {capacity}")]
    ComponentCapacity {
        /// Fixed slot count of the store.
        capacity: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for resource operations.
pub type RenderResult<T> = Result<T, RenderError>;
