use anyhow::{Result, bail};
use log::info;

use crate::frame_timer::FrameTimer;
use crate::rendering::camera::Camera;
use crate::rendering::wgpu_backend::WgpuBackend;
use crate::timing::TimerManager;
use crate::world::chunk_manager::{ChunkManager, WorldConfig, WorldStats};

mod frame_timer;
pub mod rendering;
pub mod timing;
pub mod world;

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub viewport_size: (u32, u32),
    /// Number of frames rendered before [start] returns
    pub frames: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            viewport_size: (1920, 1080),
            frames: 1,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.viewport_size;
        if width == 0 || height == 0 {
            bail!("Viewport size must be greater than zero, got {width}x{height}");
        }

        Ok(())
    }
}

/// Generates the configured world, meshes every chunk and renders it offscreen for the configured number of frames.
pub fn start(config: EngineConfig) -> Result<WorldStats> {
    config.validate()?;

    let (width, height) = config.viewport_size;
    let mut backend = pollster::block_on(WgpuBackend::new_offscreen(width, height))?;
    let camera = Camera::default();
    let mut timer = TimerManager::new();

    info!(
        "Creating a world of {} chunks with {} voxels each ({} meshing)",
        config.world.world_extents, config.world.chunk_extents, config.world.meshing_mode
    );

    let mut chunk_manager = ChunkManager::new(&config.world);
    chunk_manager.create_chunks(&mut backend, &mut timer)?;
    chunk_manager.load_chunks(&mut backend, &mut timer)?;

    let stats = chunk_manager.stats();
    info!("{stats:?}");

    let mut frame_timer = FrameTimer::new();
    for _ in 0..config.frames {
        timer.start("render_frame");
        chunk_manager.render_chunks(&mut backend, &camera, width as f32, height as f32);
        let num_draws = backend.render_frame()?;
        timer.end("render_frame");

        let dt = frame_timer.get_dt();
        info!("Frame took {:.3}ms with {num_draws} draws", dt.as_secs_f32() * 1000.0);
    }

    if frame_timer.frames() > 0 {
        info!(
            "Rendered {} frames, {:.3}ms on average",
            frame_timer.frames(),
            frame_timer.average_dt().as_secs_f32() * 1000.0
        );
    }

    for (name, duration) in timer.get_all() {
        info!("{name}: {:.3}ms", duration * 1000.0);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use crate::EngineConfig;
    use crate::world::location::Extents;

    #[test]
    fn default_config_matches_the_demo_world() {
        let config = EngineConfig::default();

        assert_eq!(config.viewport_size, (1920, 1080));
        assert_eq!(config.world.chunk_extents, Extents::new(16, 16, 16));
        assert_eq!(config.world.world_extents, Extents::new(16, 10, 16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let config = EngineConfig {
            viewport_size: (1920, 0),
            ..EngineConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
