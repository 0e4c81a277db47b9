use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// A deterministic height function over the columns of a chunk.
/// Coordinates are chunk-local, `x` in `[0, width)` and `z` in `[0, depth)`.
pub trait HeightSampler {
    fn height_sample(&self, x: usize, z: usize) -> f32;
}

impl<F: Fn(usize, usize) -> f32> HeightSampler for F {
    fn height_sample(&self, x: usize, z: usize) -> f32 {
        self(x, z)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainSettings {
    pub seed: u32,
    pub octaves: usize,
    pub frequency: f64,
    pub lacunarity: f64,
    pub gain: f64,
    /// Noise values are roughly in `[-1, 1]` and get multiplied by this before truncation
    pub height_scale: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            octaves: 5,
            frequency: 0.3,
            lacunarity: 3.0,
            gain: 1.5,
            height_scale: 15.0,
        }
    }
}

/// Fractal perlin noise terrain. Every instance owns its own noise generator.
pub struct NoiseTerrain {
    noise: Fbm<Perlin>,
    height_scale: f32,
}

impl NoiseTerrain {
    pub fn new(settings: &TerrainSettings) -> Self {
        let noise = Fbm::<Perlin>::new(settings.seed)
            .set_octaves(settings.octaves)
            .set_frequency(settings.frequency)
            .set_lacunarity(settings.lacunarity)
            .set_persistence(settings.gain);

        Self {
            noise,
            height_scale: settings.height_scale,
        }
    }

    pub fn get_noise(&self, x: f64, z: f64) -> f64 {
        self.noise.get([x, z])
    }
}

impl HeightSampler for NoiseTerrain {
    /// Heights are whole numbers, truncated toward zero
    fn height_sample(&self, x: usize, z: usize) -> f32 {
        (self.get_noise(x as f64, z as f64) as f32 * self.height_scale).trunc()
    }
}

/// Height samples for every column of a chunk, taken once per chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightMap {
    pub fn generate(sampler: &(impl HeightSampler + ?Sized), width: usize, depth: usize) -> Self {
        let heights = (0..depth)
            .flat_map(|z| (0..width).map(move |x| sampler.height_sample(x, z)))
            .collect();

        Self { width, depth, heights }
    }

    pub fn get(&self, x: usize, z: usize) -> f32 {
        debug_assert!(x < self.width && z < self.depth);

        self.heights[x + self.width * z]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use crate::world::terrain::{HeightMap, HeightSampler, NoiseTerrain, TerrainSettings};

    #[test]
    fn height_map_is_indexed_by_column() {
        let sampler = |x: usize, z: usize| (x * 10 + z) as f32;

        let map = HeightMap::generate(&sampler, 3, 2);

        assert_eq!(map.width(), 3);
        assert_eq!(map.depth(), 2);
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(2, 0), 20.0);
        assert_eq!(map.get(1, 1), 11.0);
        assert_eq!(map.get(2, 1), 21.0);
    }

    #[test]
    fn noise_terrain_is_deterministic() {
        let settings = TerrainSettings::default();
        let a = NoiseTerrain::new(&settings);
        let b = NoiseTerrain::new(&settings);

        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(a.height_sample(x, z), b.height_sample(x, z));
                assert_eq!(a.height_sample(x, z), a.height_sample(x, z));
            }
        }
    }

    #[test]
    fn noise_heights_are_whole_numbers() {
        let terrain = NoiseTerrain::new(&TerrainSettings::default());

        let map = HeightMap::generate(&terrain, 16, 16);

        for x in 0..16 {
            for z in 0..16 {
                let height = map.get(x, z);
                assert_eq!(height, height.trunc());
                assert!(height.is_finite());
            }
        }
    }

    #[test]
    fn instances_do_not_share_noise_state() {
        let mut settings = TerrainSettings::default();
        let first = NoiseTerrain::new(&settings);
        settings.seed += 1;
        let second = NoiseTerrain::new(&settings);
        let before = first.get_noise(3.7, 1.2);

        // sampling another seed does not disturb the first instance
        let differs = (0..16).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            first.get_noise(x, 1.3) != second.get_noise(x, 1.3)
        });
        assert!(differs);

        let again = NoiseTerrain::new(&TerrainSettings::default());
        assert_eq!(first.get_noise(3.7, 1.2), before);
        assert_eq!(first.get_noise(3.7, 1.2), again.get_noise(3.7, 1.2));
    }
}
