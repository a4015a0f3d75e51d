use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inclusive integer range. Built in reverse order, the bounds are swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct IntRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawRange {
    min: i32,
    max: i32,
}

impl From<RawRange> for IntRange {
    fn from(raw: RawRange) -> Self {
        IntRange::new(raw.min, raw.max)
    }
}

impl IntRange {
    pub fn new(a: i32, b: i32) -> Self {
        IntRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

impl Default for IntRange {
    fn default() -> Self {
        IntRange::new(-64, 320)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

fn default_true() -> bool {
    true
}

fn default_max_slope() -> f64 {
    0.3
}

fn default_min_clear_height() -> i32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnConditions {
    #[serde(default = "default_true")]
    pub requires_flat_ground: bool,
    #[serde(default = "default_true")]
    pub avoid_water: bool,
    #[serde(default = "default_true")]
    pub avoid_lava: bool,
    #[serde(default)]
    pub requires_sky_access: bool,
    #[serde(default = "default_max_slope")]
    pub max_slope: f64,
    #[serde(default = "default_min_clear_height")]
    pub min_clear_height: i32,
}

impl Default for SpawnConditions {
    fn default() -> Self {
        SpawnConditions {
            requires_flat_ground: default_true(),
            avoid_water: default_true(),
            avoid_lava: default_true(),
            requires_sky_access: false,
            max_slope: default_max_slope(),
            min_clear_height: default_min_clear_height(),
        }
    }
}

fn default_spawn_chance() -> f32 {
    0.01
}

fn default_min_distance_from_same() -> i32 {
    200
}

fn default_min_distance_from_any() -> i32 {
    50
}

fn default_category() -> String {
    "uncategorized".to_string()
}

/// Where a structure came from and where it may spawn naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_biome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_world_type: Option<String>,

    #[serde(default)]
    pub allowed_dimensions: BTreeSet<String>,
    #[serde(default)]
    pub forbidden_dimensions: BTreeSet<String>,
    #[serde(default)]
    pub allowed_biomes: BTreeSet<String>,
    #[serde(default)]
    pub forbidden_biomes: BTreeSet<String>,
    #[serde(default)]
    pub spawn_height_range: IntRange,
    #[serde(default)]
    pub spawn_conditions: SpawnConditions,

    #[serde(default = "default_spawn_chance")]
    pub spawn_chance: f32,
    #[serde(default = "default_min_distance_from_same")]
    pub min_distance_from_same: i32,
    #[serde(default = "default_min_distance_from_any")]
    pub min_distance_from_any: i32,
    #[serde(default)]
    pub natural_spawning: bool,

    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for SpawnMetadata {
    fn default() -> Self {
        SpawnMetadata {
            source_dimension: None,
            source_biome: None,
            source_y: None,
            source_world_type: None,
            allowed_dimensions: BTreeSet::new(),
            forbidden_dimensions: BTreeSet::new(),
            allowed_biomes: BTreeSet::new(),
            forbidden_biomes: BTreeSet::new(),
            spawn_height_range: IntRange::default(),
            spawn_conditions: SpawnConditions::default(),
            spawn_chance: default_spawn_chance(),
            min_distance_from_same: default_min_distance_from_same(),
            min_distance_from_any: default_min_distance_from_any(),
            natural_spawning: false,
            tags: BTreeSet::new(),
            category: default_category(),
        }
    }
}

impl SpawnMetadata {
    /// Stores `chance` clamped to `[0, 1]`. NaN becomes 0.
    pub fn set_spawn_chance(&mut self, chance: f32) {
        self.spawn_chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
    }

    /// Brings loaded values back inside their documented domains.
    pub fn sanitize(&mut self) {
        self.set_spawn_chance(self.spawn_chance);
        self.min_distance_from_same = self.min_distance_from_same.max(0);
        self.min_distance_from_any = self.min_distance_from_any.max(0);
    }

    /// Dimension gate: the forbidden set always applies, the allowed set only when non-empty.
    pub fn allows_dimension(&self, dimension: &str) -> bool {
        if self.forbidden_dimensions.contains(dimension) {
            return false;
        }
        self.allowed_dimensions.is_empty() || self.allowed_dimensions.contains(dimension)
    }

    pub fn allows_biome(&self, biome: &str) -> bool {
        if self.forbidden_biomes.contains(biome) {
            return false;
        }
        self.allowed_biomes.is_empty() || self.allowed_biomes.contains(biome)
    }
}
