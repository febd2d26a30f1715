//! # Graphic Components
//!
//! Renderable entity records, pool-allocated for O(1) recycling.
//!
//! Components are exactly the kind of many-same-size, short-lived record
//! the slot pool was built for: spawning pops a slot, despawning pushes it
//! back, and the slab never reallocates.

use std::io::Read;
use std::ptr::NonNull;

use prism_core::{HeapRegion, PoolAllocator};

use crate::assets::{ResourceId, ResourceManager};
use crate::error::{RenderError, RenderResult};
use crate::upload::DeviceUploader;

/// Ties a renderable entity to its loaded mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicComponent {
    /// The mesh this component draws.
    pub resource: ResourceId,
}

/// Handle to a live component in a [`ComponentStore`].
///
/// Handles are not generational: once released, a handle is dead, and a
/// copy of it kept around may observe whatever component recycles the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentHandle {
    slot: NonNull<GraphicComponent>,
}

/// Fixed-capacity store of graphic components over a slot pool.
///
/// The slab is committed once at construction; create and release never
/// touch the heap again.
pub struct ComponentStore {
    /// Backing slab for `pool`; same lifetime, dropped together.
    backing: HeapRegion,
    pool: PoolAllocator<GraphicComponent, u16>,
    live: Vec<ComponentHandle>,
}

impl ComponentStore {
    /// Builds a store with room for `capacity` components.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero or exceeds the pool's `u16` index
    /// range - construction-time contract violations.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut backing = HeapRegion::new(capacity * std::mem::size_of::<GraphicComponent>());
        // SAFETY: the slab sits in the same struct as the pool and nothing
        // else touches it; heap storage keeps its address when the struct
        // moves.
        let pool = unsafe { PoolAllocator::new(backing.base(), capacity) };
        Self {
            backing,
            pool,
            live: Vec::with_capacity(capacity),
        }
    }

    /// Creates a component referencing an already-loaded resource.
    pub fn create(&mut self, resource: ResourceId) -> RenderResult<ComponentHandle> {
        let slot = self
            .pool
            .alloc_slot()
            .ok_or(RenderError::ComponentCapacity {
                capacity: self.pool.capacity(),
            })?;
        // SAFETY: `slot` is uninitialized storage for one component.
        unsafe { slot.as_ptr().write(GraphicComponent { resource }) };
        let handle = ComponentHandle { slot };
        self.live.push(handle);
        Ok(handle)
    }

    /// Loads a mesh through `resources` and creates a component for it.
    pub fn create_from_mesh(
        &mut self,
        resources: &mut ResourceManager,
        uploader: &mut dyn DeviceUploader,
        reader: impl Read,
    ) -> RenderResult<ComponentHandle> {
        let resource = resources.load_mesh(uploader, reader)?;
        self.create(resource)
    }

    /// Releases a component, recycling its slot.
    ///
    /// Returns false when the handle is not live (already released).
    pub fn release(&mut self, handle: ComponentHandle) -> bool {
        let Some(position) = self.live.iter().position(|h| *h == handle) else {
            return false;
        };
        self.live.swap_remove(position);
        // SAFETY: the handle was live, so its slot came from this pool and
        // has not been recycled yet. GraphicComponent is Copy - no drop.
        unsafe { self.pool.dealloc_slot(handle.slot) };
        true
    }

    /// Reads a live component. Returns `None` for released handles.
    #[must_use]
    pub fn get(&self, handle: ComponentHandle) -> Option<&GraphicComponent> {
        self.live.contains(&handle).then(|| {
            // SAFETY: live handles point at initialized slots, and the
            // returned borrow pins the store.
            unsafe { handle.slot.as_ref() }
        })
    }

    /// Iterates the live components in creation order (releases permute it).
    pub fn iter(&self) -> impl Iterator<Item = &GraphicComponent> {
        // SAFETY: as in `get` - every handle in `live` is valid.
        self.live.iter().map(|h| unsafe { h.slot.as_ref() })
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no components are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Fixed slot capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Size of the component slab in bytes.
    #[must_use]
    pub fn slab_bytes(&self) -> usize {
        self.backing.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::bake_mesh;
    use crate::assets::Vertex;
    use crate::config::MemoryConfig;
    use crate::upload::tests::RecordingUploader;

    fn ids(store: &ComponentStore) -> Vec<ResourceId> {
        store.iter().map(|c| c.resource).collect()
    }

    fn loaded_id(manager: &mut ResourceManager, uploader: &mut RecordingUploader) -> ResourceId {
        let vertices = [Vertex {
            position: [0.0; 3],
            color: [1.0; 3],
            tex_coord: [0.0; 2],
        }];
        manager
            .load_mesh(uploader, bake_mesh(&vertices, &[0]).as_slice())
            .unwrap()
    }

    #[test]
    fn test_create_get_release() {
        let mut manager = ResourceManager::new(&MemoryConfig::default());
        let mut uploader = RecordingUploader::default();
        let resource = loaded_id(&mut manager, &mut uploader);

        let mut store = ComponentStore::new(4);
        let handle = store.create(resource).unwrap();
        assert_eq!(store.get(handle).unwrap().resource, resource);
        assert_eq!(store.len(), 1);

        assert!(store.release(handle));
        assert!(store.get(handle).is_none());
        assert!(!store.release(handle), "double release is refused");
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_and_slot_reuse() {
        let mut manager = ResourceManager::new(&MemoryConfig::default());
        let mut uploader = RecordingUploader::default();
        let resource = loaded_id(&mut manager, &mut uploader);

        let mut store = ComponentStore::new(2);
        let a = store.create(resource).unwrap();
        let _b = store.create(resource).unwrap();

        let err = store.create(resource).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ComponentCapacity { capacity: 2 }
        ));

        store.release(a);
        let c = store.create(resource).unwrap();
        assert_eq!(c, a, "the freed slot is reused first");
    }

    #[test]
    fn test_create_from_mesh_wires_the_pipeline() {
        let mut manager = ResourceManager::new(&MemoryConfig::default());
        let mut uploader = RecordingUploader::default();
        let mut store = ComponentStore::new(4);

        let vertices = [Vertex {
            position: [1.0, 2.0, 3.0],
            color: [1.0; 3],
            tex_coord: [0.0; 2],
        }];
        let handle = store
            .create_from_mesh(
                &mut manager,
                &mut uploader,
                bake_mesh(&vertices, &[0]).as_slice(),
            )
            .unwrap();

        let component = store.get(handle).unwrap();
        let resource = manager.resource(component.resource).unwrap();
        assert_eq!(resource.vertex_count, 1);
        assert_eq!(uploader.vertex_writes.len(), 1);
        assert_eq!(ids(&store), vec![component.resource]);
    }
}
