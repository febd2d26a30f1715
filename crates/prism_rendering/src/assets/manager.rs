//! Resource Manager
//!
//! Stages baked meshes through a scratch arena, carves destination ranges
//! out of the device regions, and hands the bytes to the upload seam.
//!
//! Managers are plain values wired together by the caller - there is no
//! global instance, so tests construct as many isolated managers as they
//! want.

use std::io::Read;
use std::mem;
use std::slice;

use prism_core::{Allocator, ArenaAllocator, HeapRegion};

use crate::config::MemoryConfig;
use crate::error::{RenderError, RenderResult};
use crate::region::GpuRegionAllocator;
use crate::upload::DeviceUploader;

use super::mesh::{MeshPrelude, MeshView, Vertex, PRELUDE_LEN};

/// Identifies a loaded resource within its manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(u32);

/// Where a loaded mesh lives inside the device buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicResource {
    /// Start of the vertex data inside the vertex buffer.
    pub vertex_offset: u64,
    /// Start of the index data inside the index buffer.
    pub index_offset: u64,
    /// Number of vertices uploaded.
    pub vertex_count: u32,
    /// Number of `u32` indices uploaded.
    pub index_count: u32,
}

impl GraphicResource {
    /// Size of the uploaded index data in bytes.
    #[must_use]
    pub const fn index_data_size(&self) -> u64 {
        self.index_count as u64 * mem::size_of::<u32>() as u64
    }
}

/// Loads baked meshes into the pre-committed device buffers.
///
/// Owns the host-side scratch arena (backed by its own heap region, cleared
/// at the end of every load) and the two GPU region allocators. The device
/// buffers themselves, and the queue that writes them, stay behind the
/// [`DeviceUploader`] seam.
pub struct ResourceManager {
    /// Backing storage for `scratch`; same lifetime, dropped together.
    scratch_backing: HeapRegion,
    scratch: ArenaAllocator,
    vertex_region: GpuRegionAllocator,
    index_region: GpuRegionAllocator,
    resources: Vec<GraphicResource>,
}

impl ResourceManager {
    /// Builds a manager with the budgets from `config`.
    #[must_use]
    pub fn new(config: &MemoryConfig) -> Self {
        let mut scratch_backing = HeapRegion::new(config.scratch_arena_bytes);
        // SAFETY: the backing region sits in the same struct as the arena
        // and nothing else touches it; heap storage keeps its address when
        // the struct moves.
        let scratch =
            unsafe { ArenaAllocator::new(scratch_backing.base(), scratch_backing.len()) };
        Self {
            scratch_backing,
            scratch,
            vertex_region: GpuRegionAllocator::new(config.vertex_region_bytes),
            index_region: GpuRegionAllocator::new(config.index_region_bytes),
            resources: Vec::new(),
        }
    }

    /// Stages, uploads and records one baked mesh.
    ///
    /// The scratch arena is cleared on the way out, success or failure -
    /// staged bytes never outlive the load that staged them.
    pub fn load_mesh(
        &mut self,
        uploader: &mut dyn DeviceUploader,
        reader: impl Read,
    ) -> RenderResult<ResourceId> {
        let result = self.load_mesh_inner(uploader, reader);
        self.scratch.clear();
        result
    }

    fn load_mesh_inner(
        &mut self,
        uploader: &mut dyn DeviceUploader,
        mut reader: impl Read,
    ) -> RenderResult<ResourceId> {
        let mut prelude_bytes = [0u8; PRELUDE_LEN];
        reader.read_exact(&mut prelude_bytes)?;
        let prelude = MeshPrelude::parse(&prelude_bytes)?;

        // Stage the whole container so the parser sees one buffer.
        let staged_len = PRELUDE_LEN + prelude.payload_len();
        let staged = self
            .scratch
            .alloc_aligned(staged_len, mem::align_of::<Vertex>())
            .ok_or(RenderError::ScratchExhausted {
                requested: staged_len,
            })?;
        // SAFETY: the arena handed out `staged_len` writable bytes that
        // stay valid until the end-of-load clear.
        let staged = unsafe { slice::from_raw_parts_mut(staged.as_ptr(), staged_len) };
        staged[..PRELUDE_LEN].copy_from_slice(&prelude_bytes);
        reader.read_exact(&mut staged[PRELUDE_LEN..])?;

        let mesh = MeshView::parse(staged)?;

        let vertex_len = mesh.vertex_bytes().len() as u64;
        let vertex_offset =
            self.vertex_region
                .allocate(vertex_len)
                .ok_or(RenderError::GpuRegionExhausted {
                    region: "vertex",
                    requested: vertex_len,
                    remaining: self.vertex_region.remaining(),
                })?;
        uploader.upload_vertices(vertex_offset, mesh.vertex_bytes());

        let index_len = mesh.index_bytes().len() as u64;
        let index_offset =
            self.index_region
                .allocate(index_len)
                .ok_or(RenderError::GpuRegionExhausted {
                    region: "index",
                    requested: index_len,
                    remaining: self.index_region.remaining(),
                })?;
        uploader.upload_indices(index_offset, mesh.index_bytes());

        tracing::debug!(
            vertex_count = mesh.vertex_count(),
            index_count = mesh.index_count(),
            vertex_offset,
            index_offset,
            "mesh staged and uploaded"
        );

        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(GraphicResource {
            vertex_offset,
            index_offset,
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
        });
        Ok(id)
    }

    /// Looks up a loaded resource.
    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&GraphicResource> {
        self.resources.get(id.0 as usize)
    }

    /// All resources loaded so far, in load order.
    #[must_use]
    pub fn loaded(&self) -> &[GraphicResource] {
        &self.resources
    }

    /// Occupancy of the device vertex region.
    #[must_use]
    pub const fn vertex_region(&self) -> &GpuRegionAllocator {
        &self.vertex_region
    }

    /// Occupancy of the device index region.
    #[must_use]
    pub const fn index_region(&self) -> &GpuRegionAllocator {
        &self.index_region
    }

    /// Size of the host-side scratch arena's backing region.
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch_backing.len()
    }

    /// Peak scratch usage across all loads so far.
    #[must_use]
    pub fn scratch_high_water(&self) -> usize {
        self.scratch.max_allocated()
    }
}

#[cfg(test)]
mod tests {
    use super::super::mesh::bake_mesh;
    use super::*;
    use crate::upload::tests::RecordingUploader;

    fn test_config() -> MemoryConfig {
        MemoryConfig {
            vertex_region_bytes: 4096,
            index_region_bytes: 1024,
            scratch_arena_bytes: 4096,
            component_capacity: 8,
        }
    }

    fn tri(shade: f32) -> Vec<u8> {
        let vertices: Vec<Vertex> = (0..3)
            .map(|i| Vertex {
                position: [i as f32, 0.0, 0.0],
                color: [shade, shade, shade],
                tex_coord: [0.0, 0.0],
            })
            .collect();
        bake_mesh(&vertices, &[0, 1, 2])
    }

    #[test]
    fn test_load_records_offsets_and_uploads_bytes() {
        let mut manager = ResourceManager::new(&test_config());
        let mut uploader = RecordingUploader::default();

        let baked = tri(0.5);
        let id = manager.load_mesh(&mut uploader, baked.as_slice()).unwrap();
        let resource = *manager.resource(id).unwrap();

        assert_eq!(resource.vertex_offset, 0);
        assert_eq!(resource.index_offset, 0);
        assert_eq!(resource.vertex_count, 3);
        assert_eq!(resource.index_count, 3);
        assert_eq!(resource.index_data_size(), 12);

        let vertex_len = 3 * mem::size_of::<Vertex>();
        assert_eq!(uploader.vertex_writes.len(), 1);
        assert_eq!(uploader.vertex_writes[0].0, 0);
        assert_eq!(
            uploader.vertex_writes[0].1.as_slice(),
            &baked[16..16 + vertex_len]
        );
        assert_eq!(
            uploader.index_writes[0].1.as_slice(),
            &baked[16 + vertex_len..]
        );
    }

    #[test]
    fn test_consecutive_loads_pack_the_regions() {
        let mut manager = ResourceManager::new(&test_config());
        let mut uploader = RecordingUploader::default();

        let a = manager
            .load_mesh(&mut uploader, tri(0.1).as_slice())
            .unwrap();
        let b = manager
            .load_mesh(&mut uploader, tri(0.9).as_slice())
            .unwrap();
        assert_ne!(a, b);

        let vertex_len = (3 * mem::size_of::<Vertex>()) as u64;
        assert_eq!(manager.resource(b).unwrap().vertex_offset, vertex_len);
        assert_eq!(manager.resource(b).unwrap().index_offset, 12);
        assert_eq!(manager.vertex_region().used(), vertex_len * 2);
        assert_eq!(manager.loaded().len(), 2);
    }

    #[test]
    fn test_scratch_clears_after_every_load() {
        let mut manager = ResourceManager::new(&test_config());
        let mut uploader = RecordingUploader::default();

        manager
            .load_mesh(&mut uploader, tri(0.3).as_slice())
            .unwrap();
        assert_eq!(manager.scratch.allocated(), 0);
        assert!(manager.scratch_high_water() > 0);
    }

    #[test]
    fn test_vertex_region_exhaustion_is_reported() {
        let mut config = test_config();
        config.vertex_region_bytes = 16;
        let mut manager = ResourceManager::new(&config);
        let mut uploader = RecordingUploader::default();

        let err = manager
            .load_mesh(&mut uploader, tri(0.3).as_slice())
            .unwrap_err();
        match err {
            RenderError::GpuRegionExhausted { region, .. } => assert_eq!(region, "vertex"),
            other => panic!("wrong error: {other}"),
        }
        // The failed load still released its scratch.
        assert_eq!(manager.scratch.allocated(), 0);
    }

    #[test]
    fn test_scratch_exhaustion_is_reported() {
        let mut config = test_config();
        config.scratch_arena_bytes = 32;
        let mut manager = ResourceManager::new(&config);
        let mut uploader = RecordingUploader::default();

        let err = manager
            .load_mesh(&mut uploader, tri(0.3).as_slice())
            .unwrap_err();
        assert!(matches!(err, RenderError::ScratchExhausted { .. }));
        assert!(uploader.vertex_writes.is_empty(), "nothing may upload");
    }

    #[test]
    fn test_truncated_stream_is_reported() {
        let mut manager = ResourceManager::new(&test_config());
        let mut uploader = RecordingUploader::default();

        let baked = tri(0.3);
        let err = manager
            .load_mesh(&mut uploader, &baked[..baked.len() - 4])
            .unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
