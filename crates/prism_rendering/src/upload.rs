//! # Device Upload Seam
//!
//! The one trait behind which the graphics API lives. The resource manager
//! produces byte ranges and destination offsets; implementations of
//! [`DeviceUploader`] move the bytes. Everything above the seam runs
//! without a GPU.

/// Writes staged bytes into the pre-committed device buffers.
///
/// Offsets come from the GPU region allocators, so implementations never
/// need bounds logic of their own - a range handed to this trait is already
/// inside the buffer it targets.
pub trait DeviceUploader {
    /// Writes `bytes` into the vertex buffer at `offset`.
    fn upload_vertices(&mut self, offset: u64, bytes: &[u8]);

    /// Writes `bytes` into the index buffer at `offset`.
    fn upload_indices(&mut self, offset: u64, bytes: &[u8]);
}

/// Uploads through a wgpu queue into two pre-committed device buffers.
///
/// The queue batches `write_buffer` calls internally and flushes them ahead
/// of the next submit; no staging belt is needed at these sizes.
pub struct QueueUploader<'a> {
    queue: &'a wgpu::Queue,
    vertex_buffer: &'a wgpu::Buffer,
    index_buffer: &'a wgpu::Buffer,
}

impl<'a> QueueUploader<'a> {
    /// Wires the uploader to its queue and destination buffers.
    ///
    /// The buffers must be at least as large as the regions being carved
    /// for them and created with `COPY_DST` usage.
    #[must_use]
    pub const fn new(
        queue: &'a wgpu::Queue,
        vertex_buffer: &'a wgpu::Buffer,
        index_buffer: &'a wgpu::Buffer,
    ) -> Self {
        Self {
            queue,
            vertex_buffer,
            index_buffer,
        }
    }
}

impl DeviceUploader for QueueUploader<'_> {
    fn upload_vertices(&mut self, offset: u64, bytes: &[u8]) {
        self.queue.write_buffer(self.vertex_buffer, offset, bytes);
    }

    fn upload_indices(&mut self, offset: u64, bytes: &[u8]) {
        self.queue.write_buffer(self.index_buffer, offset, bytes);
    }
}
