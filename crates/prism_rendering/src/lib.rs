//! # PRISM Rendering Resource System
//!
//! The consumers of the allocator framework: mesh bytes are staged through
//! a scratch arena, destination ranges are carved out of two pre-committed
//! device buffers, and the upload itself goes through a one-trait seam so
//! everything above it stays testable without a GPU.
//!
//! ## Data Flow
//!
//! ```text
//! baked mesh bytes -> scratch arena -> GPU region offsets -> uploader
//!                          |                  |
//!                    cleared per load    never reclaimed
//! ```
//!
//! ## ARCHITECT'S MANDATE
//!
//! - No hidden globals - managers are constructed and wired explicitly
//! - Device buffers are committed once; loads only carve offsets
//! - Scratch memory resets at the end of every load step

#![deny(missing_docs)]
// Note: unsafe code is allowed for the arena staging buffer and the
// pool-backed component store, both of which speak raw allocator pointers.
#![allow(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod assets;
pub mod config;
pub mod error;
pub mod region;
pub mod scene;
pub mod upload;

pub use assets::{bake_mesh, GraphicResource, MeshPrelude, MeshView, ResourceId, ResourceManager, Vertex};
pub use config::{kilobytes, megabytes, MemoryConfig};
pub use error::{RenderError, RenderResult};
pub use region::GpuRegionAllocator;
pub use scene::{ComponentHandle, ComponentStore, GraphicComponent};
pub use upload::{DeviceUploader, QueueUploader};
