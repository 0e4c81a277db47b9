use std::fmt::{Display, Formatter};

use cgmath::Vector3;
use strum::IntoEnumIterator;

use crate::world::chunk_data::ChunkData;
use crate::world::mesh::Vertex;
use crate::world::meshing::direction::Direction;
use crate::world::meshing::quad::{FaceData, Quad};

pub mod direction;
pub mod quad;

pub const VERTICES_PER_FACE: usize = 6;
pub const FACES_PER_VOXEL: usize = 6;

const VERTEX_POSITIONS_OFFSETS: [Vector3<f32>; 8] = [
    Vector3::new(0.0, 0.0, 0.0),
    Vector3::new(1.0, 0.0, 0.0),
    Vector3::new(0.0, 1.0, 0.0),
    Vector3::new(1.0, 1.0, 0.0),
    Vector3::new(0.0, 0.0, 1.0),
    Vector3::new(1.0, 0.0, 1.0),
    Vector3::new(0.0, 1.0, 1.0),
    Vector3::new(1.0, 1.0, 1.0),
];

// Two counterclockwise triangles per quad
const QUAD_TRIANGLES: [usize; VERTICES_PER_FACE] = [0, 1, 2, 2, 3, 0];

/// Which faces of an active voxel end up in the mesh.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MeshingMode {
    /// Every active voxel emits all six faces, including the ones hidden between two active neighbors.
    #[default]
    Full,
    /// A face is only emitted if the neighbor in its direction is inactive or outside of the chunk.
    Culled,
}

impl Display for MeshingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshingMode::Full => write!(f, "full"),
            MeshingMode::Culled => write!(f, "culled"),
        }
    }
}

pub struct ChunkMeshGenerator;

impl ChunkMeshGenerator {
    pub fn generate_mesh(data: &ChunkData, mode: MeshingMode) -> Vec<Vertex> {
        let quads = match mode {
            MeshingMode::Full => Self::generate_full_mesh(data),
            MeshingMode::Culled => Self::generate_culled_mesh(data),
        };

        Self::generate_vertices_from_quads(&quads)
    }

    pub fn generate_full_mesh(data: &ChunkData) -> Vec<Quad> {
        let mut quads = Vec::with_capacity(data.num_active() * FACES_PER_VOXEL);

        data.extents()
            .iter()
            .filter(|&pos| data.get_voxel(pos).is_active())
            .for_each(|pos| {
                let color = data.get_voxel(pos).color();
                quads.extend(Direction::iter().map(|dir| Quad::new(pos, dir, FaceData::new(color))));
            });

        quads
    }

    pub fn generate_culled_mesh(data: &ChunkData) -> Vec<Quad> {
        let mut quads = Vec::new();

        data.extents()
            .iter()
            .filter(|&pos| data.get_voxel(pos).is_active())
            .for_each(|pos| {
                let color = data.get_voxel(pos).color();

                for dir in Direction::iter() {
                    if !data.is_active(pos + dir) {
                        quads.push(Quad::new(pos, dir, FaceData::new(color)));
                    }
                }
            });

        quads
    }

    pub fn generate_vertices_from_quads(quads: &[Quad]) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(quads.len() * VERTICES_PER_FACE);

        quads.iter().for_each(|quad| {
            let pos = quad.position.to_f32();
            let corners = quad.direction.quad_corners();

            vertices.extend(
                QUAD_TRIANGLES
                    .iter()
                    .map(|&i| Vertex::new(pos + VERTEX_POSITIONS_OFFSETS[corners[i]], quad.data.color)),
            );
        });

        vertices
    }
}
