//! Choosing where a structure fits in a chunk and shaping the ground for it.

pub mod adapt;
pub mod scoring;
pub mod surface;

pub use adapt::{prepare_terrain, TerrainReport};
pub use scoring::{find_best_location, height_difference_penalty, score_candidate, TerrainCandidate};
pub use surface::{biome_surface, find_surface};
