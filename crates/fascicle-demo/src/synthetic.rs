//! Reproducible synthetic tractography: random-walk polylines with random
//! region labels.

use fascicle_config::DatasetConfig;
use fascicle_core::{TractDataset, TractVertex};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Side length of the cube tract seeds are drawn from.
const SEED_EXTENT: f32 = 100.0;

/// Distance between consecutive vertices of a tract.
const STEP: f32 = 1.0;

/// How strongly each step may bend away from the previous direction.
const BEND: f32 = 0.3;

/// Generate a dataset and its vertex array from `config`.
pub fn generate(config: &DatasetConfig) -> (TractDataset, Vec<TractVertex>) {
    let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
    let regions = config.synthetic_regions.max(1) as i32;
    let max_len = config.max_tract_vertices.max(2);

    let mut lengths = Vec::with_capacity(config.synthetic_tracts as usize);
    let mut labels = Vec::with_capacity(config.synthetic_tracts as usize);
    let mut vertices = Vec::new();

    for _ in 0..config.synthetic_tracts {
        let len = rng.gen_range(2..=max_len);
        let mut pos = random_vec(&mut rng) * (SEED_EXTENT * 0.5);
        let mut dir = random_direction(&mut rng);

        for _ in 0..len {
            vertices.push(TractVertex::from(pos));
            dir = (dir + random_vec(&mut rng) * BEND).normalize_or(dir);
            pos += dir * STEP;
        }

        lengths.push(u64::from(len));
        labels.push(rng.gen_range(0..regions));
    }

    (TractDataset::from_lengths(&lengths, labels), vertices)
}

/// A vector with components uniform in `[-1, 1)`.
fn random_vec(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
}

fn random_direction(rng: &mut impl Rng) -> Vec3 {
    random_vec(rng).normalize_or(Vec3::X)
}
