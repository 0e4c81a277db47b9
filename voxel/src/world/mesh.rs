use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use cgmath::Vector3;
use static_assertions::assert_eq_size;
use wgpu::vertex_attr_array;

/// One vertex of a chunk mesh: interleaved position and color, six 32-bit floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

assert_eq_size!(Vertex, [f32; Vertex::FLOATS]);

impl Vertex {
    pub const FLOATS: usize = 6;

    pub fn new(position: Vector3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            color: color.into(),
        }
    }

    /// Attribute 0 is the position, attribute 1 the color. Both are three floats wide.
    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = vertex_attr_array![0 => Float32x3, 1 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as _,
            attributes: &ATTRIBUTES,
            step_mode: wgpu::VertexStepMode::Vertex,
        }
    }
}
