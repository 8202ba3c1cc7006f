//! GPU vertex + index storage for the skinned mesh

use std::sync::LazyLock;

use skinning_core::mesh::VERTEX_STRIDE;
use skinning_core::{AttributeKind, INFLUENCES_PER_VERTEX, MeshData, VERTEX_ATTRIBUTES};

use super::growable_buffer::GrowableBuffer;

/// Room for the reference mesh without regrowing.
const INITIAL_VERTEX_BYTES: u64 = 64 * VERTEX_STRIDE;
const INITIAL_INDEX_BYTES: u64 = 256 * 2;

const fn vertex_format(kind: AttributeKind) -> wgpu::VertexFormat {
    match kind {
        AttributeKind::Float32x2 => wgpu::VertexFormat::Float32x2,
        AttributeKind::Uint32 => wgpu::VertexFormat::Uint32,
        AttributeKind::Float32 => wgpu::VertexFormat::Float32,
    }
}

/// wgpu attributes derived from the shared attribute table.
static WGPU_ATTRIBUTES: LazyLock<[wgpu::VertexAttribute; 1 + 2 * INFLUENCES_PER_VERTEX]> =
    LazyLock::new(|| {
        std::array::from_fn(|i| {
            let desc = &VERTEX_ATTRIBUTES[i];
            wgpu::VertexAttribute {
                format: vertex_format(desc.kind),
                offset: desc.offset,
                shader_location: desc.location,
            }
        })
    });

/// Vertex buffer layout of [`skinning_core::Vertex`].
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: WGPU_ATTRIBUTES.as_slice(),
    }
}

/// Vertex and index buffers for one skinned mesh.
///
/// Both buffers are released exactly once, when this value is dropped.
pub struct SkinnedMeshBuffers {
    vertices: GrowableBuffer,
    indices: GrowableBuffer,
    index_count: u32,
}

impl SkinnedMeshBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            vertices: GrowableBuffer::new(
                device,
                wgpu::BufferUsages::VERTEX,
                "Skinned Mesh Vertices",
                INITIAL_VERTEX_BYTES,
            ),
            indices: GrowableBuffer::new(
                device,
                wgpu::BufferUsages::INDEX,
                "Skinned Mesh Indices",
                INITIAL_INDEX_BYTES,
            ),
            index_count: 0,
        }
    }

    /// Replace both buffers with the mesh contents.
    ///
    /// Safe to call repeatedly; earlier contents are discarded.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &MeshData) {
        self.vertices
            .replace(device, queue, bytemuck::cast_slice(mesh.vertices()));
        self.indices
            .replace(device, queue, bytemuck::cast_slice(mesh.indices()));
        self.index_count = mesh.indices().len() as u32;

        tracing::debug!(
            "Uploaded mesh: {} vertices, {} triangles",
            mesh.vertices().len(),
            mesh.triangle_count()
        );
    }

    /// Bind both buffers and draw the whole mesh.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..self.vertices.len()));
        pass.set_index_buffer(
            self.indices.buffer().slice(..self.indices.len()),
            wgpu::IndexFormat::Uint16,
        );
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_attribute_table() {
        let layout = vertex_buffer_layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 7);

        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, (0..7).collect::<Vec<_>>());

        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
        for attribute in &layout.attributes[1..4] {
            assert_eq!(attribute.format, wgpu::VertexFormat::Uint32);
        }
        for attribute in &layout.attributes[4..7] {
            assert_eq!(attribute.format, wgpu::VertexFormat::Float32);
        }
    }

    #[test]
    fn test_attributes_fit_in_stride() {
        for attribute in vertex_buffer_layout().attributes {
            assert!(attribute.offset + attribute.format.size() <= VERTEX_STRIDE);
        }
    }
}
