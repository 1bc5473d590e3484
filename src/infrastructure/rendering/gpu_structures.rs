use bytemuck::{Pod, Zeroable};

use crate::domain::geometry::{ColorVertex, Vertex};
use crate::domain::instances::InstanceRecord;
use crate::domain::math::{IDENTITY, Mat4};

/// Types that can be bound as a vertex buffer. Mesh attributes use shader
/// locations 0 and 1, instance attributes 2 and 3.
pub trait GpuLayout: Pod {
    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
}

impl GpuLayout for Vertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

impl ColorVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
}

impl GpuLayout for ColorVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

impl InstanceRecord {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3];
}

/// Per-instance attributes advance once per instance, not per vertex.
impl GpuLayout for InstanceRecord {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRecord>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Uniform block: the combined projection · view · model matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub transform: Mat4,
}

impl SceneUniforms {
    pub fn new() -> Self {
        Self { transform: IDENTITY }
    }

    pub fn from_transform(transform: Mat4) -> Self {
        Self { transform }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self::new()
    }
}

/// Mesh vertex layout paired with the instance layout, in slot order.
pub fn mesh_layouts<V: GpuLayout>() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [V::layout(), InstanceRecord::layout()]
}
