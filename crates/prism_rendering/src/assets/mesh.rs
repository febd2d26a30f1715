//! Baked Mesh Container
//!
//! The runtime side of the offline bake step. Models are converted ahead of
//! time into a flat container the loader can stage without per-vertex work:
//!
//! ```text
//! Baked Mesh Layout:
//! ├── "PRSMMESH" (8 bytes)  - Container tag
//! ├── vertex_count (u32 LE)
//! ├── index_count  (u32 LE)
//! ├── vertex data           - vertex_count * size_of::<Vertex>() bytes
//! └── index data            - index_count * 4 bytes (u32 indices)
//! ```
//!
//! Vertex and index payloads are raw memory dumps of the bake host; they are
//! never reinterpreted here, only measured, sliced and uploaded.

use bytemuck::{Pod, Zeroable};

use crate::error::{RenderError, RenderResult};

/// Container tag opening every baked mesh.
pub const MESH_TAG: [u8; 8] = *b"PRSMMESH";

/// Bytes before the payload: tag plus the two counts.
pub const PRELUDE_LEN: usize = 16;

/// One mesh vertex as the shaders consume it.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Per-vertex color.
    pub color: [f32; 3],
    /// Texture coordinates.
    pub tex_coord: [f32; 2],
}

/// The fixed-size front of a baked mesh: tag and element counts.
///
/// Parsed first so the loader can size its staging allocation before
/// reading the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPrelude {
    /// Number of vertices in the payload.
    pub vertex_count: u32,
    /// Number of `u32` indices in the payload.
    pub index_count: u32,
}

impl MeshPrelude {
    /// Validates the tag and reads the counts.
    pub fn parse(bytes: &[u8; PRELUDE_LEN]) -> RenderResult<Self> {
        if bytes[..8] != MESH_TAG {
            let mut found = [0u8; 8];
            found.copy_from_slice(&bytes[..8]);
            return Err(RenderError::BadAssetTag { found });
        }
        let vertex_count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let index_count = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        Ok(Self {
            vertex_count,
            index_count,
        })
    }

    /// Vertex payload size in bytes.
    #[must_use]
    pub const fn vertex_bytes_len(&self) -> usize {
        self.vertex_count as usize * std::mem::size_of::<Vertex>()
    }

    /// Index payload size in bytes.
    #[must_use]
    pub const fn index_bytes_len(&self) -> usize {
        self.index_count as usize * std::mem::size_of::<u32>()
    }

    /// Total payload size following the prelude.
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.vertex_bytes_len() + self.index_bytes_len()
    }
}

/// A parsed view over a complete baked mesh buffer.
///
/// Borrows the staged bytes; nothing is copied.
#[derive(Debug)]
pub struct MeshView<'a> {
    prelude: MeshPrelude,
    vertex_bytes: &'a [u8],
    index_bytes: &'a [u8],
}

impl<'a> MeshView<'a> {
    /// Parses a full container: prelude plus both payload ranges.
    pub fn parse(bytes: &'a [u8]) -> RenderResult<Self> {
        if bytes.len() < PRELUDE_LEN {
            return Err(RenderError::TruncatedAsset {
                expected: PRELUDE_LEN,
                actual: bytes.len(),
            });
        }
        let mut prelude_bytes = [0u8; PRELUDE_LEN];
        prelude_bytes.copy_from_slice(&bytes[..PRELUDE_LEN]);
        let prelude = MeshPrelude::parse(&prelude_bytes)?;

        let expected = PRELUDE_LEN + prelude.payload_len();
        if bytes.len() < expected {
            return Err(RenderError::TruncatedAsset {
                expected,
                actual: bytes.len(),
            });
        }

        let vertex_end = PRELUDE_LEN + prelude.vertex_bytes_len();
        Ok(Self {
            prelude,
            vertex_bytes: &bytes[PRELUDE_LEN..vertex_end],
            index_bytes: &bytes[vertex_end..expected],
        })
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.prelude.vertex_count
    }

    /// Number of `u32` indices.
    #[must_use]
    pub const fn index_count(&self) -> u32 {
        self.prelude.index_count
    }

    /// The raw vertex payload, ready for upload.
    #[must_use]
    pub const fn vertex_bytes(&self) -> &'a [u8] {
        self.vertex_bytes
    }

    /// The raw index payload, ready for upload.
    #[must_use]
    pub const fn index_bytes(&self) -> &'a [u8] {
        self.index_bytes
    }
}

/// Serializes a mesh into the baked container format.
///
/// This is the output stage of the offline bake tool, also used by tests to
/// build fixtures.
///
/// # Panics
///
/// Panics if either element count exceeds `u32::MAX`.
#[must_use]
pub fn bake_mesh(vertices: &[Vertex], indices: &[u32]) -> Vec<u8> {
    let vertex_count = u32::try_from(vertices.len()).expect("mesh too large to bake");
    let index_count = u32::try_from(indices.len()).expect("mesh too large to bake");

    let mut baked = Vec::with_capacity(
        PRELUDE_LEN + vertices.len() * std::mem::size_of::<Vertex>() + indices.len() * 4,
    );
    baked.extend_from_slice(&MESH_TAG);
    baked.extend_from_slice(&vertex_count.to_le_bytes());
    baked.extend_from_slice(&index_count.to_le_bytes());
    baked.extend_from_slice(bytemuck::cast_slice(vertices));
    baked.extend_from_slice(bytemuck::cast_slice(indices));
    baked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> (Vec<Vertex>, Vec<u32>) {
        let corners = [
            ([0.0, 0.0], [0.0, 0.0]),
            ([1.0, 0.0], [1.0, 0.0]),
            ([1.0, 1.0], [1.0, 1.0]),
            ([0.0, 1.0], [0.0, 1.0]),
        ];
        let vertices = corners
            .iter()
            .map(|&([x, y], uv)| Vertex {
                position: [x, y, 0.0],
                color: [1.0, 1.0, 1.0],
                tex_coord: uv,
            })
            .collect();
        (vertices, vec![0, 1, 2, 2, 3, 0])
    }

    #[test]
    fn test_bake_then_parse_round_trip() {
        let (vertices, indices) = quad();
        let baked = bake_mesh(&vertices, &indices);

        let mesh = MeshView::parse(&baked).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.vertex_bytes(), bytemuck::cast_slice::<_, u8>(&vertices));
        assert_eq!(mesh.index_bytes(), bytemuck::cast_slice::<_, u8>(&indices));
    }

    #[test]
    fn test_bad_tag_rejected() {
        let (vertices, indices) = quad();
        let mut baked = bake_mesh(&vertices, &indices);
        baked[0] = b'X';

        let err = MeshView::parse(&baked).unwrap_err();
        assert!(matches!(err, RenderError::BadAssetTag { .. }));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let (vertices, indices) = quad();
        let baked = bake_mesh(&vertices, &indices);

        let err = MeshView::parse(&baked[..baked.len() - 1]).unwrap_err();
        match err {
            RenderError::TruncatedAsset { expected, actual } => {
                assert_eq!(expected, baked.len());
                assert_eq!(actual, baked.len() - 1);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_short_prelude_rejected() {
        let err = MeshView::parse(b"PRSM").unwrap_err();
        assert!(matches!(err, RenderError::TruncatedAsset { .. }));
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        let baked = bake_mesh(&[], &[]);
        let mesh = MeshView::parse(&baked).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.vertex_bytes().is_empty());
        assert!(mesh.index_bytes().is_empty());
    }
}
