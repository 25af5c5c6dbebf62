use accutrace_gpu::{AllocatedBuffer, GpuContext};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

pub const QUAD_VERTICES: [Vertex; 4] = [
    // Top right
    Vertex {
        position: [1.0, 1.0, 0.0],
        texcoord: [1.0, 1.0],
    },
    // Bottom right
    Vertex {
        position: [1.0, -1.0, 0.0],
        texcoord: [1.0, 0.0],
    },
    // Bottom left
    Vertex {
        position: [-1.0, -1.0, 0.0],
        texcoord: [0.0, 0.0],
    },
    // Top left
    Vertex {
        position: [-1.0, 1.0, 0.0],
        texcoord: [0.0, 1.0],
    },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

impl Vertex {
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

/// The full-screen quad both passes draw. Its two triangles wind clockwise
/// in clip space, so pipelines drawing it must not cull.
#[derive(Debug)]
pub struct RenderSurface {
    vertex_buffer: AllocatedBuffer<Vertex>,
    index_buffer: AllocatedBuffer<u32>,
}

impl RenderSurface {
    pub fn new(ctx: &GpuContext) -> Self {
        Self {
            vertex_buffer: AllocatedBuffer::with_data(
                ctx,
                "Quad vertices",
                wgpu::BufferUsages::VERTEX,
                &QUAD_VERTICES,
            ),
            index_buffer: AllocatedBuffer::with_data(
                ctx,
                "Quad indices",
                wgpu::BufferUsages::INDEX,
                &QUAD_INDICES,
            ),
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(indices: &[u32]) -> f32 {
        let [a, b, c] = [indices[0], indices[1], indices[2]].map(|i| QUAD_VERTICES[i as usize].position);
        (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
    }

    #[test]
    fn quad_indices_are_fixed() {
        assert_eq!(QUAD_INDICES, [0, 1, 3, 1, 2, 3]);
    }

    #[test]
    fn both_triangles_share_winding() {
        let first = signed_area(&QUAD_INDICES[0..3]);
        let second = signed_area(&QUAD_INDICES[3..6]);
        assert!(first != 0.0 && second != 0.0);
        assert_eq!(first.signum(), second.signum());
    }

    #[test]
    fn quad_covers_clip_space() {
        let covered: f32 = QUAD_INDICES.chunks(3).map(|t| signed_area(t).abs() * 0.5).sum();
        assert_eq!(covered, 4.0);
    }

    #[test]
    fn vertex_layout_is_position_then_texcoord() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(VERTEX_ATTRIBUTES[1].offset, 12);
    }
}
