//! # Baked Assets
//!
//! The offline-baked mesh container and the manager that stages, uploads
//! and records meshes at runtime.

mod manager;
mod mesh;

pub use manager::{GraphicResource, ResourceId, ResourceManager};
pub use mesh::{bake_mesh, MeshPrelude, MeshView, Vertex, MESH_TAG, PRELUDE_LEN};
