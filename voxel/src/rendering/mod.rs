use anyhow::Result;
use cgmath::Matrix4;

use crate::world::mesh::Vertex;

pub mod camera;
#[cfg(test)]
pub(crate) mod testing;
pub mod texture;
pub mod wgpu_backend;

/// The named matrix uniforms of the chunk shader.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatrixUniform {
    Model,
    View,
    Projection,
}

/// The shader/pipeline side of chunk rendering.
///
/// A backend hands out one vertex buffer per chunk, receives the chunk meshes whenever they are rebuilt, and
/// takes the uniforms and draw calls of every frame. Buffers are released when the `VertexBuffer` value is dropped.
pub trait RenderBackend {
    type VertexBuffer;

    fn create_vertex_buffer(&mut self) -> Result<Self::VertexBuffer>;

    /// Replaces the whole content of `buffer`. Fails if the buffer had to grow and the allocation failed.
    fn upload_vertices(&mut self, buffer: &mut Self::VertexBuffer, vertices: &[Vertex]) -> Result<()>;

    fn use_program(&mut self);

    fn set_matrix(&mut self, uniform: MatrixUniform, matrix: Matrix4<f32>);

    /// Draws the first `vertex_count` vertices of `buffer` as a triangle list
    fn draw_triangles(&mut self, buffer: &Self::VertexBuffer, vertex_count: u32);
}
