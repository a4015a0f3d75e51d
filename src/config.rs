use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options for capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Largest selection, in voxels, that capture accepts.
    #[serde(default = "default_max_volume")]
    pub max_volume: u64,
    /// Smallest cuboid worth emitting as a fill region.
    #[serde(default = "default_min_optimization_size")]
    pub min_optimization_size: u64,
    /// A hollow box is only emitted when its shell is below this share of its volume.
    #[serde(default = "default_hollow_shell_ratio")]
    pub hollow_shell_ratio: f64,
    /// Lets a sparse shell replace the fill cuboid grown from the same seed
    /// when the shell covers more voxels. Off by default.
    #[serde(default)]
    pub detect_hollow_boxes: bool,
    /// Record provenance and default spawn rules.
    #[serde(default = "default_true")]
    pub capture_metadata: bool,
}

/// Options for placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Writes between cooperative yields to the host.
    #[serde(default = "default_blocks_per_yield")]
    pub blocks_per_yield: u32,
    /// Autosave is suspended for placements larger than this.
    #[serde(default = "default_autosave_threshold")]
    pub autosave_threshold: u64,
    /// Ticks to wait before loot processors run.
    #[serde(default = "default_loot_delay_ticks")]
    pub loot_delay_ticks: u32,
    #[serde(default = "default_true")]
    pub update_connections: bool,
}

/// Options for location scoring and terrain adaptation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_sample_attempts")]
    pub sample_attempts: u32,
    /// Candidates must score strictly above this.
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,
    #[serde(default = "default_tree_node_cap")]
    pub tree_node_cap: usize,
    #[serde(default = "default_leaf_link_cap")]
    pub leaf_link_cap: usize,
    /// Extra columns cleared of trees around the footprint.
    #[serde(default = "default_tree_buffer")]
    pub tree_buffer: i32,
    #[serde(default = "default_max_column_adjust")]
    pub max_column_adjust: i32,
    #[serde(default = "default_blend_radius")]
    pub blend_radius: i32,
    #[serde(default = "default_blend_max_step")]
    pub blend_max_step: i32,
    /// Surface height used when a column has no usable ground.
    #[serde(default = "default_surface_y")]
    pub default_surface_y: i32,
    #[serde(default = "default_micro_feature_chance")]
    pub micro_feature_chance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
}

fn default_true() -> bool {
    true
}
fn default_max_volume() -> u64 {
    1_000_000
}
fn default_min_optimization_size() -> u64 {
    8
}
fn default_hollow_shell_ratio() -> f64 {
    0.6
}
fn default_blocks_per_yield() -> u32 {
    100
}
fn default_autosave_threshold() -> u64 {
    1000
}
fn default_loot_delay_ticks() -> u32 {
    3
}
fn default_sample_attempts() -> u32 {
    20
}
fn default_acceptance_threshold() -> f64 {
    40.0
}
fn default_tree_node_cap() -> usize {
    500
}
fn default_leaf_link_cap() -> usize {
    50
}
fn default_tree_buffer() -> i32 {
    2
}
fn default_max_column_adjust() -> i32 {
    6
}
fn default_blend_radius() -> i32 {
    3
}
fn default_blend_max_step() -> i32 {
    2
}
fn default_surface_y() -> i32 {
    64
}
fn default_micro_feature_chance() -> f64 {
    0.2
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            max_volume: default_max_volume(),
            min_optimization_size: default_min_optimization_size(),
            hollow_shell_ratio: default_hollow_shell_ratio(),
            detect_hollow_boxes: false,
            capture_metadata: default_true(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            blocks_per_yield: default_blocks_per_yield(),
            autosave_threshold: default_autosave_threshold(),
            loot_delay_ticks: default_loot_delay_ticks(),
            update_connections: default_true(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            sample_attempts: default_sample_attempts(),
            acceptance_threshold: default_acceptance_threshold(),
            tree_node_cap: default_tree_node_cap(),
            leaf_link_cap: default_leaf_link_cap(),
            tree_buffer: default_tree_buffer(),
            max_column_adjust: default_max_column_adjust(),
            blend_radius: default_blend_radius(),
            blend_max_step: default_blend_max_step(),
            default_surface_y: default_surface_y(),
            micro_feature_chance: default_micro_feature_chance(),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
