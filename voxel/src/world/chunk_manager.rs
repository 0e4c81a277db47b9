use std::mem::size_of;

use anyhow::{Context, Result};
use cgmath::{Matrix4, Vector3};
use log::{debug, info, trace};

use crate::rendering::camera::Camera;
use crate::rendering::{MatrixUniform, RenderBackend};
use crate::timing::TimerManager;
use crate::world::chunk::Chunk;
use crate::world::chunk_data::ChunkData;
use crate::world::location::{ChunkLocation, Extents};
use crate::world::mesh::Vertex;
use crate::world::meshing::MeshingMode;
use crate::world::terrain::{HeightMap, HeightSampler, NoiseTerrain, TerrainSettings};
use crate::world::voxel::Voxel;

#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub chunk_extents: Extents,
    /// Size of the world in chunks
    pub world_extents: Extents,
    pub terrain: TerrainSettings,
    pub meshing_mode: MeshingMode,
    /// Seed for the voxel colors. Every run gets different colors without one.
    pub color_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_extents: Extents::new(16, 16, 16),
            world_extents: Extents::new(16, 10, 16),
            terrain: TerrainSettings::default(),
            meshing_mode: MeshingMode::default(),
            color_seed: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WorldStats {
    pub num_chunks: usize,
    pub num_active_voxels: usize,
    pub num_vertices: usize,
    pub num_triangles: usize,
    /// In bytes
    pub total_voxel_data_size: usize,
    /// In bytes
    pub total_mesh_data_size: usize,
}

/// Owns a fixed grid of chunks. The chunk at world grid location `(x, y, z)` lives in slot
/// `x + world_width * (y + world_height * z)` and is rendered at `(x * chunk_width, y * chunk_height, z * chunk_depth)`.
pub struct ChunkManager<B: RenderBackend> {
    chunk_extents: Extents,
    world_extents: Extents,
    meshing_mode: MeshingMode,
    terrain: Box<dyn HeightSampler>,
    colors: fastrand::Rng,
    chunks: Vec<Chunk<B>>,
}

impl<B: RenderBackend> ChunkManager<B> {
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_terrain(config, Box::new(NoiseTerrain::new(&config.terrain)))
    }

    pub fn with_terrain(config: &WorldConfig, terrain: Box<dyn HeightSampler>) -> Self {
        let colors = match config.color_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            chunk_extents: config.chunk_extents,
            world_extents: config.world_extents,
            meshing_mode: config.meshing_mode,
            terrain,
            colors,
            chunks: Vec::new(),
        }
    }

    pub fn chunk_extents(&self) -> Extents {
        self.chunk_extents
    }

    pub fn world_extents(&self) -> Extents {
        self.world_extents
    }

    pub fn chunk_index(&self, x: usize, y: usize, z: usize) -> usize {
        self.world_extents.index(x, y, z)
    }

    /// Allocates and populates every chunk of the world. Chunks of an earlier call are replaced once all new chunks
    /// exist. If an allocation fails the earlier chunks are kept and the partially created ones are released.
    pub fn create_chunks(&mut self, backend: &mut B, timer: &mut TimerManager) -> Result<()> {
        timer.start("chunk_manager_create_chunks");

        let mut chunks = Vec::with_capacity(self.world_extents.volume());
        for index in 0..self.world_extents.volume() {
            let location = ChunkLocation::from(self.world_extents.location_of(index));
            trace!("Populating chunk {:?}", *location);

            // sampled per chunk in chunk-local coordinates, neighboring chunks do not line up
            let heights = HeightMap::generate(self.terrain.as_ref(), self.chunk_extents.width, self.chunk_extents.depth);
            let data = self.populate(heights);

            let mut chunk = Chunk::from_data(backend, data)?;
            chunk.set_meshing_mode(self.meshing_mode);
            chunks.push(chunk);
        }
        self.chunks = chunks;

        if let Some(duration) = timer.end("chunk_manager_create_chunks") {
            info!("Created {} chunks of {} in {:.3}s", self.chunks.len(), self.chunk_extents, duration);
        }

        Ok(())
    }

    /// A voxel is active iff it lies below the height of its column
    fn populate(&mut self, heights: HeightMap) -> ChunkData {
        let mut data = ChunkData::new_filled_with_uniform_data(self.chunk_extents, Voxel::inactive());

        for location in self.chunk_extents.iter() {
            let height = heights.get(location.x as usize, location.z as usize);

            if (location.y as f32) < height {
                let color = Vector3::new(self.colors.f32(), self.colors.f32(), self.colors.f32());
                data.set_voxel_data(location, Voxel::new(color));
            }
        }

        data
    }

    /// Builds the mesh of every chunk in slot order. Stops at the first chunk whose mesh could not be uploaded,
    /// that chunk and all later ones stay stale.
    pub fn load_chunks(&mut self, backend: &mut B, timer: &mut TimerManager) -> Result<()> {
        timer.start("chunk_manager_load_chunks");

        let world_extents = self.world_extents;
        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            chunk
                .build_mesh(backend)
                .with_context(|| format!("Failed to load chunk {:?}", world_extents.location_of(index)))?;
        }

        if let Some(duration) = timer.end("chunk_manager_load_chunks") {
            info!("Built {} chunk meshes in {:.3}s", self.chunks.len(), duration);
        }

        Ok(())
    }

    pub fn render_chunks(&self, backend: &mut B, camera: &Camera, viewport_width: f32, viewport_height: f32) {
        backend.use_program();
        backend.set_matrix(MatrixUniform::View, camera.view_matrix());
        backend.set_matrix(MatrixUniform::Projection, camera.projection_matrix(viewport_width, viewport_height));

        for (index, chunk) in self.chunks.iter().enumerate() {
            let location = ChunkLocation::from(self.world_extents.location_of(index));

            backend.set_matrix(
                MatrixUniform::Model,
                Matrix4::from_translation(location.to_world_offset(self.chunk_extents)),
            );
            chunk.render(backend);
        }

        debug!("Rendered {} chunks", self.chunks.len());
    }

    pub fn chunks(&self) -> &[Chunk<B>] {
        &self.chunks
    }

    pub fn chunk(&self, x: usize, y: usize, z: usize) -> Option<&Chunk<B>> {
        self.slot(x, y, z)
            .and_then(|index| self.chunks.get(index))
    }

    pub fn chunk_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut Chunk<B>> {
        self.slot(x, y, z)
            .and_then(|index| self.chunks.get_mut(index))
    }

    /// World space translation of the chunk at world grid location `(x, y, z)`
    pub fn chunk_offset(&self, x: usize, y: usize, z: usize) -> Vector3<f32> {
        ChunkLocation::new(x, y, z).to_world_offset(self.chunk_extents)
    }

    fn slot(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let world = self.world_extents;
        (x < world.width && y < world.height && z < world.depth).then(|| self.chunk_index(x, y, z))
    }

    pub fn stats(&self) -> WorldStats {
        let num_active_voxels = self
            .chunks
            .iter()
            .map(|chunk| chunk.data().num_active())
            .sum();
        let num_vertices: usize = self
            .chunks
            .iter()
            .map(|chunk| chunk.vertices().len())
            .sum();
        let total_voxel_data_size = self
            .chunks
            .iter()
            .map(|chunk| chunk.data().size_in_bytes())
            .sum();

        WorldStats {
            num_chunks: self.chunks.len(),
            num_active_voxels,
            num_vertices,
            num_triangles: num_vertices / 3,
            total_voxel_data_size,
            total_mesh_data_size: num_vertices * size_of::<Vertex>(),
        }
    }
}
