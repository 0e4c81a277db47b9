use std::fmt::{Debug, Formatter};

use anyhow::{Context, Result};
use cgmath::Vector3;
use log::{debug, warn};

use crate::rendering::RenderBackend;
use crate::world::chunk_data::ChunkData;
use crate::world::location::{Extents, LocalLocation};
use crate::world::mesh::Vertex;
use crate::world::meshing::{ChunkMeshGenerator, MeshingMode};
use crate::world::voxel::Voxel;

/// A block of voxels together with the mesh that was last built from them.
///
/// The chunk owns one vertex buffer of its backend for its whole lifetime. The buffer is released when the chunk is dropped.
pub struct Chunk<B: RenderBackend> {
    data: ChunkData,
    vertices: Vec<Vertex>,
    vertex_count: u32,
    meshing_mode: MeshingMode,
    mesh_stale: bool,
    vertex_buffer: B::VertexBuffer,
}

impl<B: RenderBackend> Debug for Chunk<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("data", &self.data)
            .field("vertices", &self.vertices.len())
            .field("meshing_mode", &self.meshing_mode)
            .field("mesh_stale", &self.mesh_stale)
            .finish()
    }
}

impl<B: RenderBackend> Chunk<B> {
    pub fn new(backend: &mut B, extents: Extents) -> Result<Self> {
        Self::from_data(backend, ChunkData::new(extents))
    }

    pub fn from_data(backend: &mut B, data: ChunkData) -> Result<Self> {
        Ok(Self {
            data,
            vertices: Vec::new(),
            vertex_count: 0,
            meshing_mode: MeshingMode::default(),
            mesh_stale: true,
            vertex_buffer: backend.create_vertex_buffer()?,
        })
    }

    pub fn extents(&self) -> Extents {
        self.data.extents()
    }

    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    pub fn meshing_mode(&self) -> MeshingMode {
        self.meshing_mode
    }

    pub fn set_meshing_mode(&mut self, mode: MeshingMode) {
        if self.meshing_mode != mode {
            self.meshing_mode = mode;
            self.mesh_stale = true;
        }
    }

    /// Flat index of an in-range voxel
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        self.extents().index(x, y, z)
    }

    /// Writes outside of the chunk are ignored.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
        let Some(location) = LocalLocation::new(Vector3::new(x, y, z)).try_into_checked(self.extents()) else {
            return;
        };

        self.data.set_voxel_data(location, voxel);
        self.mesh_stale = true;
    }

    /// Reads outside of the chunk yield [Voxel::default]. See [Chunk::try_get_voxel] for a checked read.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        match self.try_get_voxel(x, y, z) {
            Some(voxel) => *voxel,
            None => {
                warn!("Voxel ({x}, {y}, {z}) is outside of chunk {}", self.extents());
                Voxel::default()
            }
        }
    }

    pub fn try_get_voxel(&self, x: i32, y: i32, z: i32) -> Option<&Voxel> {
        self.data.try_get_voxel(LocalLocation::new(Vector3::new(x, y, z)))
    }

    /// Rebuilds the whole mesh from the current voxels and replaces the content of the vertex buffer.
    /// On failure the previous mesh is kept and stays stale.
    pub fn build_mesh(&mut self, backend: &mut B) -> Result<()> {
        let vertices = ChunkMeshGenerator::generate_mesh(&self.data, self.meshing_mode);
        let vertex_count = draw_vertex_count(vertices.len())?;

        backend.upload_vertices(&mut self.vertex_buffer, &vertices)?;
        self.vertices = vertices;
        self.vertex_count = vertex_count;
        self.mesh_stale = false;

        debug!("Mesh built. Total vertices: {vertex_count}");
        Ok(())
    }

    /// Draws the mesh as it was when [Chunk::build_mesh] last ran.
    pub fn render(&self, backend: &mut B) {
        if self.vertices.is_empty() {
            debug!("Chunk {} has no vertices to render", self.extents());
            return;
        }

        backend.draw_triangles(&self.vertex_buffer, self.vertex_count());
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// The mesh as interleaved `x, y, z, r, g, b` floats
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Whether a voxel changed since the mesh was built
    pub fn is_mesh_stale(&self) -> bool {
        self.mesh_stale
    }
}

/// A single draw covers at most `u32::MAX` vertices
fn draw_vertex_count(num_vertices: usize) -> Result<u32> {
    u32::try_from(num_vertices).with_context(|| format!("Chunk mesh of {num_vertices} vertices is too large for one draw"))
}
