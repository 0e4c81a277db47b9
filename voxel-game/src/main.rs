use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};
use voxel::EngineConfig;
use voxel::world::chunk_manager::WorldConfig;
use voxel::world::location::Extents;
use voxel::world::meshing::MeshingMode;
use voxel::world::terrain::TerrainSettings;

/// Generates a voxel terrain, meshes it and renders it offscreen.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Voxels per chunk, as WIDTHxHEIGHTxDEPTH
    #[arg(long, default_value = "16x16x16")]
    chunk_size: Extents,

    /// Chunks per world, as WIDTHxHEIGHTxDEPTH
    #[arg(long, default_value = "16x10x16")]
    world_size: Extents,

    /// Terrain noise seed
    #[arg(long, default_value_t = TerrainSettings::default().seed)]
    seed: u32,

    /// Makes voxel colors reproducible
    #[arg(long)]
    color_seed: Option<u64>,

    /// Skip faces that are hidden behind a neighboring voxel
    #[arg(long)]
    culled: bool,

    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,
}

impl Args {
    fn into_engine_config(self) -> EngineConfig {
        EngineConfig {
            world: WorldConfig {
                chunk_extents: self.chunk_size,
                world_extents: self.world_size,
                terrain: TerrainSettings {
                    seed: self.seed,
                    ..TerrainSettings::default()
                },
                meshing_mode: if self.culled {
                    MeshingMode::Culled
                } else {
                    MeshingMode::Full
                },
                color_seed: self.color_seed,
            },
            viewport_size: (self.width, self.height),
            frames: self.frames,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = Args::parse().into_engine_config();

    let stats = voxel::start(config)?;
    info!(
        "Done: {} chunks, {} active voxels, {} triangles",
        stats.num_chunks, stats.num_active_voxels, stats.num_triangles
    );

    Ok(())
}
