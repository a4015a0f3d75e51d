use super::surface::find_surface;
use crate::config::TerrainConfig;
use crate::materials;
use crate::metadata::SpawnMetadata;
use crate::structure::Structure;
use crate::world::{Staging, World};
use log::debug;
use rand::Rng;

const BASE_SCORE: f64 = 100.0;
const WATER_PENALTY: f64 = 30.0;
const LAVA_PENALTY: f64 = 50.0;
const TREE_PENALTY: f64 = 5.0;

/// A sampled placement position and how well the ground under it fits.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainCandidate {
    /// Footprint corner; Y is the surface height there.
    pub location: (i32, i32, i32),
    pub score: f64,
    pub height_difference: i32,
    pub tree_blocks: u32,
    pub water_blocks: u32,
    pub lava_blocks: u32,
}

impl TerrainCandidate {
    fn rejected(location: (i32, i32, i32)) -> Self {
        TerrainCandidate {
            location,
            score: 0.0,
            height_difference: 0,
            tree_blocks: 0,
            water_blocks: 0,
            lava_blocks: 0,
        }
    }
}

/// Score lost for the spread between the highest and lowest surface.
pub fn height_difference_penalty(difference: i32) -> f64 {
    match difference {
        i32::MIN..=2 => 0.0,
        3..=4 => 10.0,
        5..=6 => 25.0,
        7..=10 => 40.0,
        _ => 70.0,
    }
}

/// Bonus for a footprint whose surface heights sit close to their mean.
pub fn flatness_bonus(mean_deviation: f64) -> f64 {
    if mean_deviation < 1.0 {
        10.0
    } else if mean_deviation < 2.0 {
        5.0
    } else {
        0.0
    }
}

/// Scores the footprint of a `size` structure whose corner sits at `location`.
/// Heights outside the metadata's range always score zero.
pub fn score_candidate(
    view: &Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    metadata: &SpawnMetadata,
    config: &TerrainConfig,
) -> TerrainCandidate {
    let mut candidate = TerrainCandidate::rejected(location);
    if !metadata.spawn_height_range.contains(location.1) {
        return candidate;
    }

    let mut heights = Vec::with_capacity((size.0.max(0) * size.2.max(0)) as usize);
    for dx in 0..size.0 {
        for dz in 0..size.2 {
            let (x, z) = (location.0 + dx, location.2 + dz);
            let surface = find_surface(view, x, z, config.default_surface_y);
            heights.push(surface);

            let ground = view.block((x, surface - 1, z));
            if materials::is_water(&ground.name) {
                candidate.water_blocks += 1;
            }
            if materials::is_lava(&ground.name) {
                candidate.lava_blocks += 1;
            }
            if materials::is_tree_block(&ground.name) {
                candidate.tree_blocks += 1;
            }
        }
    }
    if heights.is_empty() {
        return candidate;
    }

    let (min, max) = heights
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    let mean = heights.iter().map(|&h| h as f64).sum::<f64>() / heights.len() as f64;
    let deviation =
        heights.iter().map(|&h| (h as f64 - mean).abs()).sum::<f64>() / heights.len() as f64;

    let conditions = &metadata.spawn_conditions;
    let mut score = BASE_SCORE - height_difference_penalty(max - min);
    if conditions.avoid_water && candidate.water_blocks > 0 {
        score -= WATER_PENALTY;
    }
    if conditions.avoid_lava && candidate.lava_blocks > 0 {
        score -= LAVA_PENALTY;
    }
    if candidate.tree_blocks > 0 {
        score -= TREE_PENALTY;
    }
    score += flatness_bonus(deviation);

    candidate.score = score.max(0.0);
    candidate.height_difference = max - min;
    candidate
}

/// Samples positions in `chunk` and returns the best one scoring above the
/// acceptance threshold, if any. Ties keep the earliest sample.
pub fn find_best_location<R: Rng + ?Sized>(
    world: &dyn World,
    structure: &Structure,
    metadata: &SpawnMetadata,
    chunk: (i32, i32),
    config: &TerrainConfig,
    rng: &mut R,
) -> Option<TerrainCandidate> {
    let view = Staging::new(world);
    let (size_x, _, size_z) = structure.size;
    let mut candidates = Vec::new();

    for _ in 0..config.sample_attempts {
        let x = chunk.0 * 16 + rng.gen_range(0..(16 - size_x).max(1));
        let z = chunk.1 * 16 + rng.gen_range(0..(16 - size_z).max(1));
        let y = find_surface(&view, x, z, config.default_surface_y);

        let candidate = score_candidate(&view, (x, y, z), structure.size, metadata, config);
        if candidate.score > config.acceptance_threshold {
            candidates.push(candidate);
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let best = candidates.into_iter().next();
    debug!(
        "Best location for '{}' in chunk {:?}: {:?}",
        structure.id,
        chunk,
        best.as_ref().map(|c| (c.location, c.score))
    );
    best
}
