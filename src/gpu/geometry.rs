//! Lazily uploaded vertex/index buffer pair backing a mesh.

use wgpu::util::DeviceExt;

use super::render_context::RenderContext;
use crate::mesh::{Triangle, Vertex};

/// GPU vertex/index buffers plus the dirty flag controlling re-upload.
///
/// The flag starts true; the first draw after construction (or after a
/// geometry edit) replaces both buffers wholesale from the CPU arrays and
/// clears it. Clean draws bind without uploading.
pub struct GeometryBuffers {
    vertex: Option<wgpu::Buffer>,
    index: Option<wgpu::Buffer>,
    dirty: bool,
    uploads: u64,
}

impl GeometryBuffers {
    /// Create an empty, dirty buffer pair. No GPU work happens until the
    /// first [`prepare`](Self::prepare).
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertex: None,
            index: None,
            dirty: true,
            uploads: 0,
        }
    }

    /// Flag the buffers for re-upload on the next draw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether an upload is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of uploads performed since construction.
    #[must_use]
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Consume the dirty flag, reporting whether an upload is due.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Upload the full vertex and index arrays if dirty, replacing both
    /// buffers wholesale. No-op when clean.
    pub fn prepare(
        &mut self,
        gpu: &RenderContext,
        vertices: &[Vertex],
        indices: &[Triangle],
    ) {
        if !self.take_dirty() {
            return;
        }
        self.vertex = Some(gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.index = Some(gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.uploads += 1;
    }

    /// The uploaded vertex buffer, absent before the first prepare.
    #[must_use]
    pub fn vertex(&self) -> Option<&wgpu::Buffer> {
        self.vertex.as_ref()
    }

    /// The uploaded index buffer, absent before the first prepare.
    #[must_use]
    pub fn index(&self) -> Option<&wgpu::Buffer> {
        self.index.as_ref()
    }
}

impl Default for GeometryBuffers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dirty_with_no_buffers() {
        let buffers = GeometryBuffers::new();
        assert!(buffers.is_dirty());
        assert!(buffers.vertex().is_none());
        assert!(buffers.index().is_none());
        assert_eq!(buffers.upload_count(), 0);
    }

    #[test]
    fn dirty_flag_is_consumed_once() {
        let mut buffers = GeometryBuffers::new();
        assert!(buffers.take_dirty());
        // A second draw with no intervening edit performs zero uploads.
        assert!(!buffers.take_dirty());

        buffers.mark_dirty();
        assert!(buffers.take_dirty());
        assert!(!buffers.take_dirty());
    }
}
