//! One object bundling configuration, storage and the engines.

use crate::bounding_box::BoundingBox;
use crate::capture::{CaptureReport, StructureCapture};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::formats::StructureStore;
use crate::placement::{LootProcessor, PlacementReport, RotationChoice, StructurePlacer};
use crate::spawner::{NaturalSpawner, SpawnRecord};
use crate::structure::Structure;
use crate::world::World;
use log::info;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;

/// Entry point for hosts: capture to disk, place from disk, and natural
/// spawning, all sharing one configuration.
pub struct StructureLib {
    config: EngineConfig,
    store: StructureStore,
    capture: StructureCapture,
    placer: StructurePlacer,
    spawner: NaturalSpawner,
}

impl StructureLib {
    pub fn new(config: EngineConfig, structure_dir: impl Into<PathBuf>) -> Self {
        StructureLib {
            capture: StructureCapture::new(config.capture.clone()),
            placer: StructurePlacer::new(config.placement.clone()),
            spawner: NaturalSpawner::new(config.terrain.clone()),
            store: StructureStore::new(structure_dir),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &StructureStore {
        &self.store
    }

    pub fn spawner(&self) -> &NaturalSpawner {
        &self.spawner
    }

    /// Captures the volume between two corners and persists it. The file is only
    /// written once the whole capture has succeeded.
    pub fn capture_and_save(
        &self,
        world: &dyn World,
        corner_a: (i32, i32, i32),
        corner_b: (i32, i32, i32),
        id: &str,
        author: &str,
    ) -> Result<(Structure, CaptureReport)> {
        let bounds = BoundingBox::new(corner_a, corner_b);
        let (mut structure, report) = self.capture.capture_with_report(world, &bounds, id)?;
        structure.author = author.to_string();
        self.store.save(&structure)?;
        info!("Saved '{}': {} regions, {} blocks", id, report.region_count(), report.total_blocks);
        Ok((structure, report))
    }

    pub fn load(&self, id: &str) -> Result<Structure> {
        self.store.load(id)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list_ids()
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.spawner.unregister(id);
        self.store.delete(id)
    }

    pub fn place<R: Rng + ?Sized>(
        &self,
        world: &mut dyn World,
        structure: &Structure,
        origin: (i32, i32, i32),
        rotation: RotationChoice,
        loot: Option<Arc<dyn LootProcessor>>,
        rng: &mut R,
    ) -> PlacementReport {
        self.placer.place(world, structure, origin, rotation, loot, rng)
    }

    /// Loads `id` from the store and places it.
    pub fn place_by_id<R: Rng + ?Sized>(
        &self,
        world: &mut dyn World,
        id: &str,
        origin: (i32, i32, i32),
        rotation: RotationChoice,
        loot: Option<Arc<dyn LootProcessor>>,
        rng: &mut R,
    ) -> Result<PlacementReport> {
        let structure = self.store.load(id)?;
        Ok(self.place(world, &structure, origin, rotation, loot, rng))
    }

    /// Switches natural spawning on for a stored structure and saves the change.
    pub fn enable_natural_spawning(&mut self, id: &str, chance: Option<f32>) -> Result<()> {
        let mut structure = self.store.load(id)?;
        let metadata = structure.metadata_mut();
        metadata.natural_spawning = true;
        if let Some(chance) = chance {
            metadata.set_spawn_chance(chance);
        }
        let metadata = metadata.clone();
        self.store.save(&structure)?;
        self.spawner.register(id, metadata);
        Ok(())
    }

    pub fn disable_natural_spawning(&mut self, id: &str) -> Result<bool> {
        let mut structure = self.store.load(id)?;
        structure.metadata_mut().natural_spawning = false;
        self.store.save(&structure)?;
        Ok(self.spawner.unregister(id))
    }

    /// Registers every stored structure whose metadata asks for natural spawning.
    pub fn load_natural_spawns(&mut self) -> Result<usize> {
        self.spawner.load_active(&self.store)
    }

    pub fn on_chunk_load<R: Rng + ?Sized>(
        &mut self,
        world: &mut dyn World,
        chunk: (i32, i32),
        rng: &mut R,
    ) -> Vec<SpawnRecord> {
        self.spawner.on_chunk_load(world, chunk, &self.store, &self.placer, rng)
    }
}
