use std::hint::black_box;

use cgmath::Vector3;
use criterion::{Criterion, criterion_group, criterion_main};
use lazy_static::lazy_static;
use voxel::world::chunk_data::ChunkData;
use voxel::world::location::Extents;
use voxel::world::meshing::{ChunkMeshGenerator, MeshingMode};
use voxel::world::terrain::{HeightMap, NoiseTerrain, TerrainSettings};
use voxel::world::voxel::Voxel;

const EXTENTS: Extents = Extents::new(16, 16, 16);

lazy_static! {
    static ref TERRAIN_CHUNK: ChunkData = terrain_chunk();
    static ref SOLID_CHUNK: ChunkData = ChunkData::new(EXTENTS);
}

fn terrain_chunk() -> ChunkData {
    let terrain = NoiseTerrain::new(&TerrainSettings::default());
    let heights = HeightMap::generate(&terrain, EXTENTS.width, EXTENTS.depth);
    let mut data = ChunkData::new_filled_with_uniform_data(EXTENTS, Voxel::inactive());

    for location in EXTENTS.iter() {
        // offset so that some columns are actually filled
        if (location.y as f32) < heights.get(location.x as usize, location.z as usize) + 8.0 {
            data.set_voxel_data(location, Voxel::new(Vector3::new(0.3, 0.7, 0.2)));
        }
    }

    data
}

fn criterion_benchmark(c: &mut Criterion) {
    for mode in [MeshingMode::Full, MeshingMode::Culled] {
        c.bench_function(&format!("mesh terrain chunk ({mode})"), |b| {
            b.iter(|| ChunkMeshGenerator::generate_mesh(black_box(&TERRAIN_CHUNK), mode))
        });
        c.bench_function(&format!("mesh solid chunk ({mode})"), |b| {
            b.iter(|| ChunkMeshGenerator::generate_mesh(black_box(&SOLID_CHUNK), mode))
        });
    }

    c.bench_function("terrain height map", |b| {
        let terrain = NoiseTerrain::new(&TerrainSettings::default());
        b.iter(|| HeightMap::generate(black_box(&terrain), EXTENTS.width, EXTENTS.depth))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
