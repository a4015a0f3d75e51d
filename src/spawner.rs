//! Chance-driven placement of registered structures as chunks load.

use crate::config::TerrainConfig;
use crate::error::Result;
use crate::formats::StructureStore;
use crate::metadata::SpawnMetadata;
use crate::placement::{RotationChoice, StructurePlacer};
use crate::terrain::{find_best_location, prepare_terrain};
use crate::transform::Rotation;
use crate::world::World;
use log::{debug, info, warn};
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Y at which the chunk-centre biome is sampled.
const BIOME_SAMPLE_Y: i32 = 64;

/// A structure placed by the spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRecord {
    pub id: String,
    pub world: String,
    pub pos: (i32, i32, i32),
}

impl SpawnRecord {
    fn chunk(&self) -> (i32, i32) {
        (self.pos.0.div_euclid(16), self.pos.2.div_euclid(16))
    }

    fn horizontal_distance(&self, x: i32, z: i32) -> f64 {
        let dx = (self.pos.0 - x) as f64;
        let dz = (self.pos.2 - z) as f64;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Past spawns per world, bucketed by the chunk holding their origin.
type SpawnIndex = FxHashMap<String, FxHashMap<(i32, i32), Vec<SpawnRecord>>>;

/// Registry of structures that may appear on their own, keyed by structure id.
#[derive(Debug, Clone, Default)]
pub struct NaturalSpawner {
    active: BTreeMap<String, SpawnMetadata>,
    spawned: SpawnIndex,
    spawn_count: usize,
    pub terrain: TerrainConfig,
}

impl NaturalSpawner {
    pub fn new(terrain: TerrainConfig) -> Self {
        NaturalSpawner {
            active: BTreeMap::new(),
            spawned: FxHashMap::default(),
            spawn_count: 0,
            terrain,
        }
    }

    /// Activates `id` if its metadata has natural spawning switched on.
    pub fn register(&mut self, id: impl Into<String>, metadata: SpawnMetadata) -> bool {
        let id = id.into();
        if !metadata.natural_spawning {
            debug!("Not registering '{}': natural spawning is off", id);
            return false;
        }
        info!("Registered '{}' for natural spawning", id);
        self.active.insert(id, metadata);
        true
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.active.remove(id).is_some()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn spawn_count(&self) -> usize {
        self.spawn_count
    }

    /// Every recorded spawn, in no particular order.
    pub fn spawned(&self) -> impl Iterator<Item = &SpawnRecord> {
        self.spawned.values().flat_map(|chunks| chunks.values().flatten())
    }

    fn record_spawn(&mut self, record: SpawnRecord) {
        self.spawned
            .entry(record.world.clone())
            .or_default()
            .entry(record.chunk())
            .or_default()
            .push(record);
        self.spawn_count += 1;
    }

    /// Spawns in `world` whose chunk lies within `radius` blocks of `chunk`,
    /// measured in whole chunks. Only the buckets in that window are visited.
    fn spawns_near<'a>(
        &'a self,
        world: &str,
        chunk: (i32, i32),
        radius: i32,
    ) -> impl Iterator<Item = &'a SpawnRecord> + 'a {
        let reach = radius.max(0) / 16 + 1;
        let chunks = self.spawned.get(world);
        (chunk.0 - reach..=chunk.0 + reach)
            .flat_map(move |x| (chunk.1 - reach..=chunk.1 + reach).map(move |z| (x, z)))
            .filter_map(move |key| chunks.and_then(|chunks| chunks.get(&key)))
            .flatten()
    }

    /// Registers every stored structure with natural spawning on. Files that
    /// fail to load are skipped.
    pub fn load_active(&mut self, store: &StructureStore) -> Result<usize> {
        let mut registered = 0;
        for id in store.list_ids()? {
            match store.load(&id) {
                Ok(structure) => {
                    if self.register(id, structure.metadata_or_default()) {
                        registered += 1;
                    }
                }
                Err(err) => warn!("Skipping structure '{}': {}", id, err),
            }
        }
        Ok(registered)
    }

    /// Whether a structure may appear in `chunk`. The chance roll is consumed
    /// only once the dimension gate has passed.
    fn passes_gates<R: Rng + ?Sized>(
        &self,
        id: &str,
        metadata: &SpawnMetadata,
        world: &dyn World,
        chunk: (i32, i32),
        rng: &mut R,
    ) -> bool {
        if !metadata.allows_dimension(&world.dimension_name()) {
            return false;
        }
        if rng.gen::<f32>() > metadata.spawn_chance {
            return false;
        }

        let (cx, cz) = (chunk.0 * 16 + 8, chunk.1 * 16 + 8);
        let biome = world.biome((cx, BIOME_SAMPLE_Y, cz));
        if !metadata.allows_biome(&biome) {
            debug!("'{}' not allowed in biome {}", id, biome);
            return false;
        }

        let radius = metadata.min_distance_from_any.max(metadata.min_distance_from_same);
        for record in self.spawns_near(world.name(), chunk, radius) {
            let distance = record.horizontal_distance(cx, cz);
            if distance < metadata.min_distance_from_any as f64
                || (record.id == id && distance < metadata.min_distance_from_same as f64)
            {
                return false;
            }
        }
        true
    }

    /// Tries every active structure against a freshly loaded chunk and places
    /// those that pass their gates and find suitable ground.
    pub fn on_chunk_load<R: Rng + ?Sized>(
        &mut self,
        world: &mut dyn World,
        chunk: (i32, i32),
        store: &StructureStore,
        placer: &StructurePlacer,
        rng: &mut R,
    ) -> Vec<SpawnRecord> {
        let mut placed = Vec::new();
        let candidates: Vec<(String, SpawnMetadata)> = self
            .active
            .iter()
            .map(|(id, metadata)| (id.clone(), metadata.clone()))
            .collect();

        for (id, metadata) in candidates {
            if !self.passes_gates(&id, &metadata, &*world, chunk, rng) {
                continue;
            }

            let structure = match store.load(&id) {
                Ok(structure) => structure,
                Err(err) => {
                    warn!("Natural spawn of '{}' skipped: {}", id, err);
                    continue;
                }
            };
            let Some(candidate) =
                find_best_location(&*world, &structure, &metadata, chunk, &self.terrain, rng)
            else {
                debug!("No suitable ground for '{}' in chunk {:?}", id, chunk);
                continue;
            };

            let terrain = prepare_terrain(
                world,
                candidate.location,
                structure.size,
                &metadata,
                &self.terrain,
                rng,
            );
            let report = placer.place(
                world,
                &structure,
                candidate.location,
                RotationChoice::Fixed(Rotation::None),
                None,
                rng,
            );

            let record = SpawnRecord {
                id: id.clone(),
                world: world.name().to_string(),
                pos: candidate.location,
            };
            info!(
                "Naturally spawned '{}' at {:?} in {} (score {:.1}, {} blocks, {} tree blocks cleared)",
                id,
                record.pos,
                record.world,
                candidate.score,
                report.blocks_placed,
                terrain.tree_blocks_removed
            );
            self.record_spawn(record.clone());
            placed.push(record);
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_state::BlockState;
    use crate::region::{RegionDescriptor, SpanRegion};
    use crate::structure::Structure;
    use crate::world::{Environment, MemoryWorld};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always_spawning() -> SpawnMetadata {
        SpawnMetadata {
            natural_spawning: true,
            spawn_chance: 1.0,
            ..SpawnMetadata::default()
        }
    }

    fn temp_store(name: &str) -> StructureStore {
        let dir = std::env::temp_dir()
            .join(format!("structurist_spawner_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        StructureStore::new(dir)
    }

    fn flat_world() -> MemoryWorld {
        let mut world = MemoryWorld::new("world");
        world.fill((-16, 61, -16), (63, 63, 63), &BlockState::new("minecraft:dirt"));
        world.fill((-16, 64, -16), (63, 64, 63), &BlockState::new("minecraft:grass_block"));
        world
    }

    fn hut(metadata: SpawnMetadata) -> Structure {
        let mut structure = Structure::new("hut", (3, 2, 3));
        structure.regions.push(RegionDescriptor::Fill(SpanRegion::new(
            (0, 0, 0),
            (2, 1, 2),
            "minecraft:oak_planks",
            None,
        )));
        structure.metadata = Some(metadata);
        structure
    }

    #[test]
    fn test_register_requires_natural_spawning() {
        let mut spawner = NaturalSpawner::default();
        assert!(!spawner.register("hut", SpawnMetadata::default()));
        assert!(spawner.register("hut", always_spawning()));
        assert!(spawner.is_active("hut"));
        assert!(spawner.unregister("hut"));
        assert!(!spawner.unregister("hut"));
    }

    #[test]
    fn test_load_active_skips_inactive_and_broken() {
        let store = temp_store("load");
        store.save(&hut(always_spawning())).unwrap();
        store.save(&Structure::new("statue", (1, 3, 1))).unwrap();
        std::fs::write(store.dir().join("broken.json"), "[]").unwrap();

        let mut spawner = NaturalSpawner::default();
        assert_eq!(spawner.load_active(&store).unwrap(), 1);
        assert_eq!(spawner.active_ids().collect::<Vec<_>>(), vec!["hut"]);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_spawns_and_respects_distance() {
        let store = temp_store("spawn");
        store.save(&hut(always_spawning())).unwrap();
        let mut spawner = NaturalSpawner::default();
        spawner.register("hut", always_spawning());

        let mut world = flat_world();
        let placer = StructurePlacer::default();
        let mut rng = StdRng::seed_from_u64(9);

        let placed = spawner.on_chunk_load(&mut world, (0, 0), &store, &placer, &mut rng);
        assert_eq!(placed.len(), 1);
        let pos = placed[0].pos;
        assert!((0..16).contains(&pos.0) && (0..16).contains(&pos.2));
        assert_eq!(world.block(pos).short_name(), "oak_planks");

        let again = spawner.on_chunk_load(&mut world, (1, 0), &store, &placer, &mut rng);
        assert!(again.is_empty());
        assert_eq!(spawner.spawn_count(), 1);
        assert_eq!(spawner.spawned().count(), 1);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_distance_gate_only_sees_nearby_chunks() {
        let mut spawner = NaturalSpawner::default();
        let record = |id: &str, world: &str, pos| SpawnRecord {
            id: id.to_string(),
            world: world.to_string(),
            pos,
        };
        spawner.record_spawn(record("hut", "world", (5000, 64, -5000)));
        spawner.record_spawn(record("hut", "other", (8, 64, 8)));
        spawner.record_spawn(record("tower", "world", (-70, 64, 8)));

        let metadata = always_spawning();
        let world = flat_world();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(spawner.passes_gates("hut", &metadata, &world, (0, 0), &mut rng));
        assert_eq!(spawner.spawns_near("world", (0, 0), 200).count(), 1);
        assert_eq!(spawner.spawns_near("world", (0, 0), 50).count(), 0);

        spawner.record_spawn(record("tower", "world", (30, 64, 8)));
        assert!(!spawner.passes_gates("hut", &metadata, &world, (0, 0), &mut rng));
        assert_eq!(spawner.spawn_count(), 4);
    }

    #[test]
    fn test_forbidden_dimension_and_biome_gates() {
        let mut metadata = always_spawning();
        metadata.forbidden_dimensions.insert("nether".to_string());
        metadata.allowed_biomes.insert("desert".to_string());
        let spawner = NaturalSpawner::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut world = flat_world();
        world.set_environment(Environment::Nether);
        assert!(!spawner.passes_gates("hut", &metadata, &world, (0, 0), &mut rng));

        world.set_environment(Environment::Normal);
        assert!(!spawner.passes_gates("hut", &metadata, &world, (0, 0), &mut rng));

        world.set_biome(8, 8, "desert");
        assert!(spawner.passes_gates("hut", &metadata, &world, (0, 0), &mut rng));
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut metadata = always_spawning();
        metadata.spawn_chance = 0.0;
        let spawner = NaturalSpawner::default();
        let world = flat_world();
        let mut rng = StdRng::seed_from_u64(2);
        for chunk in 0..20 {
            assert!(!spawner.passes_gates("hut", &metadata, &world, (chunk, 0), &mut rng));
        }
    }
}
