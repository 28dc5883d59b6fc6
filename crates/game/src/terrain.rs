//! Heightfield terrain from fractal noise.
//!
//! All noise is derived from `config.seed`, so the same seed always produces the
//! same ground at every (x, z).

use glam::Vec3;
use noise::{NoiseFn, Perlin, Simplex};
use physics::PhysicsWorld;
use serde::{Deserialize, Serialize};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for terrain generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Size of terrain in world units.
    pub size: f32,
    /// Number of samples per side.
    pub resolution: u32,
    /// Maximum height of terrain.
    pub height_scale: f32,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 256.0,
            resolution: 97,
            height_scale: 12.0,
            frequency: 0.012,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Generated heightmap, row-major (index = z * resolution + x).
#[derive(Debug, Clone)]
pub struct Terrain {
    pub heightmap: Vec<f32>,
    pub config: TerrainConfig,
}

impl Terrain {
    /// Generate terrain for `seed`.
    pub fn generate(config: TerrainConfig, seed: u64) -> Self {
        let config = TerrainConfig {
            resolution: config.resolution.max(2),
            ..config
        };
        let perlin = Perlin::new(deterministic_noise_seed(seed, 0));
        let simplex = Simplex::new(deterministic_noise_seed(seed, 1));

        let res = config.resolution as usize;
        let step = config.size / (res - 1) as f32;
        let half = config.size / 2.0;

        let mut heightmap = Vec::with_capacity(res * res);
        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - half;
                let world_z = z as f32 * step - half;
                let n = fractal_noise(&perlin, &simplex, world_x as f64, world_z as f64, &config);
                heightmap.push(n as f32 * config.height_scale);
            }
        }

        log::debug!(
            "Generated {}x{} terrain ({} units, seed {})",
            res,
            res,
            config.size,
            seed
        );
        Self { heightmap, config }
    }

    /// Register the heightfield with the physics world.
    pub fn add_to_physics(&self, physics: &mut PhysicsWorld) -> Option<physics::ColliderHandle> {
        physics.add_terrain_heightfield(
            &self.heightmap,
            self.config.resolution as usize,
            self.config.size,
        )
    }

    /// Bilinear height at a world position, clamped to the terrain edge.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let res = self.config.resolution as usize;
        let half = self.config.size / 2.0;
        let step = self.config.size / (res - 1) as f32;

        let gx = ((x + half) / step).clamp(0.0, (res - 1) as f32);
        let gz = ((z + half) / step).clamp(0.0, (res - 1) as f32);

        let x0 = (gx.floor() as usize).min(res - 2);
        let z0 = (gz.floor() as usize).min(res - 2);
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;

        let h00 = self.heightmap[z0 * res + x0];
        let h10 = self.heightmap[z0 * res + x0 + 1];
        let h01 = self.heightmap[(z0 + 1) * res + x0];
        let h11 = self.heightmap[(z0 + 1) * res + x0 + 1];

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fz
    }

    /// Point on the surface below (x, z).
    pub fn surface_point(&self, x: f32, z: f32) -> Vec3 {
        Vec3::new(x, self.height_at(x, z), z)
    }
}

fn fractal_noise(perlin: &Perlin, simplex: &Simplex, x: f64, z: f64, config: &TerrainConfig) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.frequency;
    let mut max_value = 0.0;

    for _ in 0..config.octaves.max(1) {
        // Mix Perlin and Simplex for variety
        let perlin_sample = perlin.get([x * frequency, z * frequency]);
        let simplex_sample = simplex.get([x * frequency + 1000.0, z * frequency + 1000.0]);

        value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
        max_value += amplitude;

        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    // Normalize to 0-1 range
    (value / max_value + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TerrainConfig {
        TerrainConfig {
            size: 64.0,
            resolution: 24,
            ..Default::default()
        }
    }

    /// Same seed must produce identical heightmaps.
    #[test]
    fn terrain_deterministic_same_seed() {
        let a = Terrain::generate(small(), 98765);
        let b = Terrain::generate(small(), 98765);
        assert_eq!(a.heightmap, b.heightmap);
    }

    #[test]
    fn terrain_different_seed_different_heights() {
        let a = Terrain::generate(small(), 11111);
        let b = Terrain::generate(small(), 22222);
        assert_ne!(a.heightmap, b.heightmap);
    }

    #[test]
    fn height_at_matches_grid_samples_and_stays_in_range() {
        let t = Terrain::generate(small(), 5);
        let res = t.config.resolution as usize;
        let step = t.config.size / (res - 1) as f32;
        let (x, z) = (3, 7);
        let wx = x as f32 * step - 32.0;
        let wz = z as f32 * step - 32.0;
        assert!((t.height_at(wx, wz) - t.heightmap[z * res + x]).abs() < 1e-3);

        for h in t.heightmap.iter() {
            assert!((0.0..=t.config.height_scale).contains(h));
        }
        // outside the edge clamps instead of panicking
        let _ = t.height_at(1e6, -1e6);
    }
}
