//! The host world as seen by capture, placement and terrain adaptation.

pub mod memory;
mod staging;

pub use memory::MemoryWorld;
pub use staging::{apply_writes, Staging, VoxelWrite};

use crate::block_entity::BlockEntityData;
use crate::block_state::BlockState;
use crate::bounding_box::BoundingBox;
use crate::entity::{EntitySnapshot, EntitySpawn};
use crate::error::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Environment {
    Normal,
    Nether,
    TheEnd,
    Custom(String),
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Normal => f.write_str("NORMAL"),
            Environment::Nether => f.write_str("NETHER"),
            Environment::TheEnd => f.write_str("THE_END"),
            Environment::Custom(name) => f.write_str(name),
        }
    }
}

/// Work the host runs later on its own schedule.
pub type DeferredTask = Box<dyn FnOnce(&mut dyn World)>;

/// Read and write access to a voxel world.
///
/// Heights are inclusive: `min_height()..=max_height()` is the buildable range.
pub trait World {
    fn name(&self) -> &str;
    fn environment(&self) -> Environment;
    fn min_height(&self) -> i32;
    fn max_height(&self) -> i32;

    fn block(&self, pos: (i32, i32, i32)) -> BlockState;
    fn set_block(&mut self, pos: (i32, i32, i32), state: &BlockState) -> Result<()>;
    fn biome(&self, pos: (i32, i32, i32)) -> String;

    /// Saved data of the block entity at `pos`, if the voxel has one.
    fn block_entity(&self, pos: (i32, i32, i32)) -> Result<Option<BlockEntityData>>;
    fn set_block_entity(&mut self, pos: (i32, i32, i32), data: &BlockEntityData) -> Result<()>;

    /// Live entities whose block position lies inside `bounds`.
    fn entities_in(&self, bounds: &BoundingBox) -> Vec<EntitySnapshot>;
    fn spawn_entity(&mut self, spawn: &EntitySpawn) -> Result<()>;

    fn autosave(&self) -> bool;
    fn set_autosave(&mut self, enabled: bool);

    /// Gives the host a chance to run other work during a long placement.
    fn yield_now(&mut self) {}

    fn schedule(&mut self, delay_ticks: u32, task: DeferredTask);

    fn is_valid_height(&self, y: i32) -> bool {
        y >= self.min_height() && y <= self.max_height()
    }

    /// `overworld`, `nether`, `end`, or the world name for other environments.
    fn dimension_name(&self) -> String {
        match self.environment() {
            Environment::Normal => "overworld".to_string(),
            Environment::Nether => "nether".to_string(),
            Environment::TheEnd => "end".to_string(),
            Environment::Custom(_) => self.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_names() {
        let mut world = MemoryWorld::new("world");
        assert_eq!(world.dimension_name(), "overworld");
        world.set_environment(Environment::Nether);
        assert_eq!(world.dimension_name(), "nether");
        world.set_environment(Environment::Custom("AETHER".to_string()));
        assert_eq!(world.dimension_name(), "world");
    }

    #[test]
    fn test_valid_height_is_inclusive() {
        let world = MemoryWorld::new("world");
        assert!(world.is_valid_height(-64));
        assert!(world.is_valid_height(319));
        assert!(!world.is_valid_height(320));
        assert!(!world.is_valid_height(-65));
    }
}
